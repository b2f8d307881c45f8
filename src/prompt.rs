use crate::engine::is_valid_folder_name;
use inquire::{validator::Validation, Confirm, CustomUserError, Text};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("Error occurred trying to prompt user")]
    #[diagnostic(
        code(foldergen::prompt::inquire),
        help("Pass the root name and --yes to run without a terminal")
    )]
    Inquire(#[from] inquire::InquireError),
}

/// Asks for the root folder name, offering `default` and rejecting names that
/// cannot be used as a folder.
pub fn get_root_name(default: &str) -> Result<String, PromptError> {
    let mut prompt = Text::new("Root folder name:")
        .with_help_message("Created inside the assets root; groups are nested beneath it")
        .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
            if is_valid_folder_name(input) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    "Please enter a valid name without path separators or special characters"
                        .into(),
                ))
            }
        });

    if is_valid_folder_name(default) {
        prompt = prompt.with_default(default);
    }

    Ok(prompt.prompt()?)
}

pub fn apply_changes() -> Result<bool, PromptError> {
    let answer = Confirm::new("Create these folders?")
        .with_default(true)
        .with_help_message("Existing folders are left untouched")
        .prompt()?;

    Ok(answer)
}
