pub const EXTRACT_JOBS_PROMPT_TEMPLATE: &str = r#"### SCRAPED TEXT FROM WEBSITE:
{page_data}
### INSTRUCTION:
The scraped text is from the careers page of a website.
Your job is to extract the job postings and return them as a JSON array.
Each element must be an object with the keys `role` (string), `experience` (string or null),
`skills` (array of strings) and `description` (string).
If the text contains no job postings, return an empty array [].
Only return the valid JSON.
### VALID JSON (NO PREAMBLE):"#;

pub const WRITE_EMAIL_PROMPT_TEMPLATE: &str = r#"### JOB DESCRIPTION:
Role: {role}
{experience_line}Skills: {skills}
{description}

### INSTRUCTION:
You are {sender_name}, a {sender_title} at {company}. {company_pitch}
Your job is to write a cold email to the client regarding the job mentioned above, describing
how {company} can fulfil their needs for the {role} role.
Add the most relevant ones from the following links to showcase {company}'s portfolio:
{link_list}
Remember you are {sender_name}, {sender_title} at {company}.
Do not provide a preamble.
### EMAIL (NO PREAMBLE):"#;
