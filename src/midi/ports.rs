use super::{MidiError, PortTarget, Result};
use dialoguer::{theme::ColorfulTheme, Select};
use log::info;

/// A named port wins; otherwise fall back to a virtual port called `virtual_name`.
pub fn resolve_port(name: Option<&str>, virtual_name: &str) -> PortTarget {
    match name {
        Some(name) => PortTarget::Named(name.to_string()),
        None => PortTarget::Virtual(virtual_name.to_string()),
    }
}

/// Asks the user to choose one of `ports`. The last entry creates a virtual port instead.
pub fn pick_port(prompt: &str, ports: &[String], virtual_name: &str) -> Result<PortTarget> {
    let mut items: Vec<String> = ports.to_vec();
    items.push(format!("Create virtual port '{}'", virtual_name));

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| MidiError::ConnectionError(format!("port selection aborted: {}", e)))?;

    let target = match ports.get(selection) {
        Some(name) => PortTarget::Named(name.clone()),
        None => PortTarget::Virtual(virtual_name.to_string()),
    };
    info!("{} -> {:?}", prompt, target);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_port_wins_over_virtual() {
        assert_eq!(
            resolve_port(Some("IAC Bus 1"), "sonisyncrs input"),
            PortTarget::Named("IAC Bus 1".to_string())
        );
    }

    #[test]
    fn test_missing_name_creates_virtual_port() {
        assert_eq!(
            resolve_port(None, "sonisyncrs output"),
            PortTarget::Virtual("sonisyncrs output".to_string())
        );
    }
}
