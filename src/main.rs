// ==========================================
// JobTracker Import Engine - CLI entry point
// ==========================================
// Demo driver: tokenize a file, print the preview, commit to the
// in-memory store and report the result. The real product calls the
// same ImportApi from its HTTP layer.
// ==========================================

use jobtrack_importer::{
    logging, ApiError, FileKind, ImportApi, MemoryStore, TargetSchema, APP_NAME, VERSION,
};
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    tracing::info!("{} v{}", APP_NAME, VERSION);

    let mut args = std::env::args().skip(1);
    let Some(file_path) = args.next() else {
        eprintln!("usage: jobtrack-importer <file.(json|ndjson|csv|xlsx)> [application|interview]");
        return ExitCode::FAILURE;
    };
    let schema = match args.next().as_deref() {
        None | Some("application") => TargetSchema::Application,
        Some("interview") => TargetSchema::Interview,
        Some(other) => {
            eprintln!("unknown schema '{}', expected application or interview", other);
            return ExitCode::FAILURE;
        }
    };

    let extension = Path::new(&file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let Some(kind) = FileKind::from_extension(extension) else {
        eprintln!("unsupported file extension '{}'", extension);
        return ExitCode::FAILURE;
    };

    let bytes = match std::fs::read(&file_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("cannot read {}: {}", file_path, err);
            return ExitCode::FAILURE;
        }
    };

    let mut api = ImportApi::with_defaults(MemoryStore::new());
    let preview = match api.load_file(&bytes, kind, schema) {
        Ok(preview) => preview,
        Err(ApiError::NoDataFound) => {
            eprintln!("no data found in the file - check the format and column names");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} row(s) read, {} record(s) ready to import",
        preview.total_rows,
        preview.full.len()
    );
    for record in &preview.sample {
        match serde_json::to_string(record) {
            Ok(line) => println!("  {}", line),
            Err(_) => println!("  <unserializable record>"),
        }
    }
    if preview.full.len() > preview.sample.len() {
        println!("  ... and {} more", preview.full.len() - preview.sample.len());
    }

    match api.confirm().await {
        Ok(result) if result.success => {
            println!(
                "imported {} record(s), skipped {}",
                result.imported_count, result.skipped_count
            );
            for error in &result.errors {
                println!("  note: {}", error);
            }
            ExitCode::SUCCESS
        }
        Ok(result) => {
            eprintln!("import failed:");
            for error in &result.errors {
                eprintln!("  {}", error);
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
