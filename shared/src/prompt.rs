use crate::types::Result;
use dialoguer::Input;

pub fn ask_text(prompt: &str, allow_empty: bool) -> Result<String> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(allow_empty)
        .interact_text()?;
    Ok(answer.trim().to_string())
}
