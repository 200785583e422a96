//! Endpoint listing command handler.

use anyhow::{Result, bail};

use super::Session;
use crate::endpoint::{EndpointCategory, EndpointGroup};
use crate::ui::Style;

/// Prints the fallback order of one or every endpoint group.
pub fn print_endpoints(category: Option<&str>, session: &Session) -> Result<()> {
    let categories = match category {
        Some(key) => {
            let Some(category) = EndpointCategory::from_key(key) else {
                bail!(
                    "Unknown endpoint category '{key}'\n\n\
                     Available categories: translate, fix_grammar, learn_grammar"
                );
            };
            vec![category]
        }
        None => EndpointCategory::ALL.to_vec(),
    };

    for (i, category) in categories.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_group(category, &session.config.group(category));
    }

    Ok(())
}

fn print_group(category: EndpointCategory, group: &EndpointGroup) {
    println!("{}", Style::header(category));

    if group.is_empty() {
        println!("  (no valid endpoints)");
        return;
    }

    for (position, endpoint) in group.fallback_order().enumerate() {
        let marker = if position == 0 {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        };
        println!(
            "  {}. {}{}",
            position + 1,
            Style::value(&endpoint.name),
            marker
        );
        println!(
            "     {} {}  {} {}s",
            Style::label("url:"),
            endpoint.url,
            Style::label("timeout:"),
            endpoint.timeout_seconds
        );
    }

    let skipped = group.endpoints.len() - group.fallback_order().count();
    if skipped > 0 {
        println!(
            "  {}",
            Style::warning(format!("{skipped} endpoint(s) without URL skipped"))
        );
    }
}
