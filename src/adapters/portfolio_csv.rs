use crate::domain::model::{Portfolio, PortfolioEntry};
use crate::utils::error::{ColdMailError, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PortfolioRow {
    #[serde(rename = "Techstack", alias = "techstack", alias = "skills")]
    techstack: String,
    #[serde(rename = "Links", alias = "links", alias = "link")]
    links: String,
}

/// 從 CSV 檔案載入作品集
pub fn load_portfolio<P: AsRef<Path>>(path: P) -> Result<Portfolio> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| ColdMailError::Portfolio {
        message: format!("Cannot open {}: {}", path.display(), e),
    })?;
    let portfolio = read_portfolio(file)?;
    tracing::info!(
        "📂 Loaded {} portfolio entries from {}",
        portfolio.len(),
        path.display()
    );
    Ok(portfolio)
}

/// Reads `Techstack,Links` rows; `Techstack` is a comma-separated skill list.
pub fn read_portfolio<R: Read>(reader: R) -> Result<Portfolio> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut entries = Vec::new();
    for (index, row) in csv_reader.deserialize::<PortfolioRow>().enumerate() {
        // 標題列佔第 1 行
        let line = index + 2;
        let row = row?;
        let entry = PortfolioEntry::new(row.techstack.split(','), row.links.trim());

        if entry.link.is_empty() {
            return Err(ColdMailError::Portfolio {
                message: format!("row {} has an empty link", line),
            });
        }
        if entry.skills.is_empty() {
            return Err(ColdMailError::Portfolio {
                message: format!("row {} ({}) lists no skills", line, entry.link),
            });
        }
        entries.push(entry);
    }

    Ok(Portfolio::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_rows_in_order() {
        let data = "Techstack,Links\n\
                    \"React, Node.js, MongoDB\",https://example.com/react-portfolio\n\
                    \"Python, SQL\",https://example.com/python-portfolio\n";
        let portfolio = read_portfolio(data.as_bytes()).unwrap();

        assert_eq!(portfolio.len(), 2);
        assert_eq!(portfolio.entries()[0].skills, vec!["react", "node.js", "mongodb"]);
        assert_eq!(portfolio.entries()[1].link, "https://example.com/python-portfolio");
    }

    #[test]
    fn test_accepts_lowercase_headers() {
        let data = "skills,link\n\"Rust, Tokio\",https://example.com/rust\n";
        let portfolio = read_portfolio(data.as_bytes()).unwrap();
        assert_eq!(portfolio.entries()[0].skills, vec!["rust", "tokio"]);
    }

    #[test]
    fn test_rejects_blank_link() {
        let data = "Techstack,Links\n\"Rust\",  \n";
        let err = read_portfolio(data.as_bytes()).unwrap_err();
        match err {
            ColdMailError::Portfolio { message } => assert!(message.contains("row 2")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_row_without_skills() {
        let data = "Techstack,Links\n\" , \",https://example.com/empty\n";
        assert!(matches!(
            read_portfolio(data.as_bytes()),
            Err(ColdMailError::Portfolio { .. })
        ));
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let data = "Name,Links\nfoo,https://example.com\n";
        assert!(matches!(read_portfolio(data.as_bytes()), Err(ColdMailError::Csv(_))));
    }

    #[test]
    fn test_load_portfolio_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Techstack,Links").unwrap();
        writeln!(file, "\"Python, Django\",https://example.com/django").unwrap();

        let portfolio = load_portfolio(file.path()).unwrap();
        assert_eq!(portfolio.len(), 1);
    }

    #[test]
    fn test_load_portfolio_missing_file() {
        let err = load_portfolio("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, ColdMailError::Portfolio { .. }));
    }
}
