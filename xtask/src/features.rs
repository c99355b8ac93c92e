use std::process::Command;

use anyhow::{Context, Result};

/// `evictkit-common` feature tiers that must each compile on their own.
const FEATURE_COMBINATIONS: &[&[&str]] = &[
    &[], // default
    &["foundation"],
    &["observability"],
    &["test-utils"],
    &["observability", "test-utils"],
];

/// Check that every `evictkit-common` feature combination compiles, then
/// that the cache crate builds on top of the minimal tier.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} evictkit-common feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let joined = features.join(",");
        let is_default = features.is_empty();
        let display_label = if is_default { "default".to_string() } else { joined.clone() };
        let feature_arg = if is_default { None } else { Some(joined) };

        println!(
            "\n[{}/{}] cargo check -p evictkit-common{}",
            index + 1,
            FEATURE_COMBINATIONS.len(),
            feature_arg.as_ref().map(|arg| format!(" --features {arg}")).unwrap_or_default()
        );

        let mut command = Command::new("cargo");
        command.arg("check").arg("-p").arg("evictkit-common").arg("--no-default-features");

        if let Some(feature_list) = feature_arg.as_ref() {
            command.arg("--features").arg(feature_list.as_str());
        }

        let status = command
            .status()
            .with_context(|| format!("Failed to run cargo check for '{display_label}'"))?;

        if !status.success() {
            anyhow::bail!("Feature combination '{display_label}' failed to compile");
        }

        println!("✅ Features '{display_label}' compiled successfully");
    }

    println!("\ncargo check -p evictkit-cache");
    let status = Command::new("cargo")
        .args(["check", "-p", "evictkit-cache"])
        .status()
        .context("Failed to run cargo check for evictkit-cache")?;
    if !status.success() {
        anyhow::bail!("evictkit-cache failed to compile against the foundation tier");
    }

    println!("\n✅ All {} feature combinations compile successfully!", FEATURE_COMBINATIONS.len());

    Ok(())
}
