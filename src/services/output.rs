use crate::cli::OutputFormat;
use crate::domain::models::{ErrorBody, ErrorOut, JsonOut};
use serde::Serialize;

pub fn print_one<T: Serialize>(
    format: OutputFormat,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        ),
        OutputFormat::Text => println!("{}", row(&data)),
    }
    Ok(())
}

pub fn print_error(format: OutputFormat, kind: &str, message: &str) {
    match format {
        OutputFormat::Json => {
            let out = ErrorOut {
                ok: false,
                error: ErrorBody {
                    kind: kind.to_string(),
                    message: message.to_string(),
                },
            };
            match serde_json::to_string_pretty(&out) {
                Ok(s) => println!("{}", s),
                Err(_) => eprintln!("error: {}", message),
            }
        }
        OutputFormat::Text => eprintln!("error [{}]: {}", kind, message),
    }
}
