use clap::Parser;
use contact_import::core::export::{export_contacts, import_manual, write_sample};
use contact_import::core::{ConfigProvider, ContactField, ParsedUpload};
use contact_import::utils::error::ErrorSeverity;
use contact_import::utils::logger;
use contact_import::utils::validation::{validate_path, Validate};
use contact_import::{
    ClientSettings, CliConfig, ColumnMapping, Command, HttpContactApi, ImportArgs, ImportSession,
    LocalStorage, Result,
};
use std::io::Read;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config.command);

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: CliConfig) -> Result<()> {
    let settings = config.settings()?;
    settings.validate()?;
    tracing::debug!("Using API at {}", settings.api_base_url());

    let api = HttpContactApi::from_config(&settings);

    match config.command {
        Command::Import(args) => run_import(api, &settings, args).await,
        Command::Manual { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => read_stdin()?,
            };
            let result = import_manual(&api, &text).await?;
            println!("✅ Imported {} contacts!", result.imported);
            if !result.errors.is_empty() {
                println!("⚠️  {} contacts failed to import", result.errors.len());
            }
            Ok(())
        }
        Command::Export { output_dir } => {
            validate_path("output_dir", &output_dir)?;
            let storage = LocalStorage::new(output_dir.clone());
            let filename = export_contacts(&api, &storage).await?;
            println!("✅ Contacts exported to {}/{}", output_dir, filename);
            Ok(())
        }
        Command::Sample { output } => {
            validate_path("output", &output)?;
            let storage = LocalStorage::new(".".to_string());
            write_sample(&storage, &output).await?;
            println!("✅ Sample CSV written to {}", output);
            Ok(())
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

async fn run_import(api: HttpContactApi, settings: &ClientSettings, args: ImportArgs) -> Result<()> {
    let mut session = ImportSession::with_preview_rows(api, settings.preview_rows());

    // Step 1: upload
    if args.file == "-" {
        let text = read_stdin()?;
        session.load_text("stdin", &text)?;
    } else {
        let storage = LocalStorage::new(".".to_string());
        session.load_file(&storage, &args.file).await?;
    }

    // Step 2: mapping
    for field in &args.skip {
        session.set_column(field.parse()?, None)?;
    }
    let overrides = [
        (ContactField::Phone, &args.phone),
        (ContactField::Name, &args.name),
        (ContactField::Email, &args.email),
        (ContactField::Tags, &args.tags),
    ];
    for (field, column) in overrides {
        if let Some(column) = column {
            session.map_column(field, column)?;
        }
    }

    if let (Some(upload), Some(mapping)) = (session.upload(), session.mapping()) {
        print_mapping(upload, mapping);
        print_preview(upload, mapping);
    }
    session.proceed_to_preview()?;

    // Step 3: preview & import
    let (contacts, skipped) = session.pending_contacts()?;
    println!(
        "📊 {} contacts ready to import, {} rows without a phone number skipped",
        contacts.len(),
        skipped
    );

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing was sent");
        return Ok(());
    }

    let summary = session.submit().await?;
    println!("✅ Successfully imported {} contacts!", summary.imported);
    if summary.failed() > 0 {
        println!("⚠️  {} contacts failed to import", summary.failed());
        for error in &summary.errors {
            tracing::debug!("Row error: {}", error);
        }
    }
    Ok(())
}

fn print_mapping(upload: &ParsedUpload, mapping: &ColumnMapping) {
    println!("📄 File: {} ({} data rows)", upload.source_name, upload.data_rows);
    println!("CSV headers detected: {}", upload.headers.fields.join(" | "));
    for field in ContactField::ALL {
        let column = upload
            .header_for(mapping.get(field))
            .unwrap_or("Not set");
        println!("  {:<6} <- {}", field.as_str(), column);
    }
}

fn print_preview(upload: &ParsedUpload, mapping: &ColumnMapping) {
    println!();
    println!("{:>3}  {:<16} {:<20} {:<26} {}", "#", "Phone", "Name", "Email", "Tags");
    for (i, row) in upload.preview.iter().enumerate() {
        let cell = |field: ContactField| match mapping.get(field) {
            Some(index) => row.get(index).to_string(),
            None => "-".to_string(),
        };
        let phone = match cell(ContactField::Phone) {
            p if p.is_empty() || p == "-" => "Missing".to_string(),
            p => p,
        };
        println!(
            "{:>3}  {:<16} {:<20} {:<26} {}",
            i + 1,
            phone,
            cell(ContactField::Name),
            cell(ContactField::Email),
            cell(ContactField::Tags)
        );
    }
    if upload.data_rows > upload.preview.len() {
        println!("... and {} more rows", upload.data_rows - upload.preview.len());
    }
    println!();
}
