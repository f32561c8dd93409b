//! # Help Command

use anyhow::Result;

use crate::domain::traits::ChatProvider;
use crate::strings::help;

pub async fn handle_help(chat: &impl ChatProvider) -> Result<()> {
    chat.send_message(help::HELP)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
