use crate::core::{ContactApi, ContactRecord, ExportedContact, ImportResult, Storage};
use crate::utils::error::{ImportError, Result};
use chrono::{NaiveDate, Utc};

pub const SAMPLE_FILENAME: &str = "contacts_sample.csv";

/// Template offered to users who need a starting point for their own file.
pub const SAMPLE_CSV: &str = "Name,Phone,Email,Tags
John Doe,919876543210,john@example.com,customer;vip
Jane Smith,918765432109,jane@example.com,customer
Bob Wilson,917654321098,bob@example.com,lead";

const EXPORT_HEADERS: [&str; 4] = ["Name", "Phone", "Email", "Tags"];

pub async fn write_sample<S: Storage>(storage: &S, path: &str) -> Result<()> {
    storage.write_file(path, SAMPLE_CSV.as_bytes()).await?;
    tracing::info!("Sample CSV written to {}", path);
    Ok(())
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("contacts_{}.csv", date.format("%Y-%m-%d"))
}

/// Plain header line, then data rows with every field quoted and tags joined with `;`.
pub fn render_export_csv(contacts: &[ExportedContact]) -> Result<String> {
    let mut header = EXPORT_HEADERS.join(",").into_bytes();
    header.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(header);

    for contact in contacts {
        let tags = contact.tags.join(";");
        writer.write_record([
            contact.name.as_deref().unwrap_or(""),
            contact.phone.as_deref().unwrap_or(""),
            contact.email.as_deref().unwrap_or(""),
            tags.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
    String::from_utf8(bytes).map_err(|e| ImportError::ConfigError {
        message: format!("export produced invalid UTF-8: {}", e),
    })
}

/// Fetch all contacts and save them as a dated CSV. Returns the file name.
pub async fn export_contacts<A, S>(api: &A, storage: &S) -> Result<String>
where
    A: ContactApi,
    S: Storage,
{
    let contacts = api.export_contacts().await?;
    tracing::info!("Exporting {} contacts", contacts.len());

    let content = render_export_csv(&contacts)?;
    let filename = export_filename(Utc::now().date_naive());
    storage.write_file(&filename, content.as_bytes()).await?;

    tracing::info!("Contacts exported to {}", filename);
    Ok(filename)
}

/// Pasted `phone,name,email` lines. A plain comma split, no quote handling;
/// lines without a phone are dropped.
pub fn parse_manual_lines(text: &str) -> Vec<ContactRecord> {
    text.trim()
        .split('\n')
        .filter_map(|line| {
            let mut parts = line.split(',').map(str::trim);
            let phone = parts.next().unwrap_or("");
            if phone.is_empty() {
                return None;
            }
            Some(ContactRecord {
                phone: phone.to_string(),
                name: parts.next().unwrap_or("").to_string(),
                email: parts.next().unwrap_or("").to_string(),
                tags: Vec::new(),
            })
        })
        .collect()
}

pub async fn import_manual<A: ContactApi>(api: &A, text: &str) -> Result<ImportResult> {
    let contacts = parse_manual_lines(text);
    if contacts.is_empty() {
        return Err(ImportError::NoValidContacts);
    }

    tracing::info!("Submitting {} manually entered contacts", contacts.len());
    let result = api.import_contacts(&contacts).await?;
    tracing::info!("Imported {} contacts", result.imported);
    Ok(result)
}
