use crate::server;
use clap::{Args, Parser, Subcommand};
use quote_intake::error::AppError;
use quote_intake::workflows::quotes::{
    normalize, validate, QuoteSubmission, SubmissionError, SubmissionResult,
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Quote Intake",
    about = "Serve and check relocation quote requests from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check a quote request JSON file without storing it
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Path to a JSON document shaped like the quote form
    pub(crate) path: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args),
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.path)?;
    let output = check_submission(&raw)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Offline dry run: the normalized row on success, otherwise the failure contract.
pub(crate) fn check_submission(raw: &str) -> Result<serde_json::Value, AppError> {
    let submission: QuoteSubmission = serde_json::from_str(raw)?;
    let output = match validate(&submission) {
        Ok(request) => json!({
            "success": true,
            "data": normalize(&request),
        }),
        Err(errors) => {
            serde_json::to_value(SubmissionResult::failed(&SubmissionError::Validation(errors)))?
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_FORM: &str = r#"{
        "quote_option": "upload_inventory",
        "inventory_file_name": "inventory.pdf",
        "move_type": "within_sa",
        "nearest_branch": "George",
        "consignment_type": "office",
        "move_date": "2024-09-30",
        "first_name": "Lerato",
        "last_name": "Dlamini",
        "phone": "044 555 0100",
        "email": "lerato@example.com",
        "collection_city": "George",
        "collection_province": "Western Cape",
        "collection_country": "ZA",
        "collection_location_type": "house",
        "delivery_city": "Bloemfontein",
        "delivery_province": "Free State",
        "delivery_country": "ZA",
        "delivery_location_type": "apartment"
    }"#;

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["quote-intake-api"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["quote-intake-api", "validate", "form.json"])
            .expect("parses");
        match cli.command {
            Some(Command::Validate(args)) => assert_eq!(args.path, PathBuf::from("form.json")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn valid_form_prints_the_normalized_row() {
        let output = check_submission(VALID_FORM).expect("checks");

        assert_eq!(output["success"], true);
        assert_eq!(output["data"]["inventory_file_name"], "inventory.pdf");
        assert_eq!(output["data"]["item_list"], serde_json::Value::Null);
        assert_eq!(output["data"]["move_date"], "2024-09-30");
    }

    #[test]
    fn invalid_form_prints_field_errors() {
        let output = check_submission(r#"{"quote_option": "type_list"}"#).expect("checks");

        assert_eq!(output["success"], false);
        assert_eq!(output["failure"], "validation");
        assert_eq!(output["field_errors"][0]["field"], "item_list");
    }

    #[test]
    fn unreadable_json_is_a_payload_error() {
        let err = check_submission(r#"{"move_date": "someday"}"#).expect_err("bad date");
        assert!(matches!(err, AppError::Payload(_)));
    }
}
