//! `languages/go` - Go 툴체인 버전

use hostfacts_core::{PluginContext, PluginFragment, PluginRegistry};
use hostfacts_foundation::Result;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref GO_VERSION: Regex = Regex::new(r"go version go(\S+)").unwrap();
}

pub fn register(registry: &PluginRegistry) -> Result<()> {
    registry.load(
        "Go",
        PluginFragment::v7()
            .source("builtin/go")
            .provides(["languages/go"])
            .depends(["languages"])
            .collect_data(collect),
    )?;
    Ok(())
}

fn collect(ctx: &mut PluginContext<'_>) -> Result<()> {
    let output = ctx.shell_out("go version")?;
    if !output.success() {
        debug!("go version exited with {}", output.exit_status);
        return Ok(());
    }

    if let Some(version) = parse_version(&output.stdout) {
        ctx.set_attribute("languages/go/version", version);
    }
    Ok(())
}

/// `go version go1.1.2 darwin/amd64` → `1.1.2`
fn parse_version(stdout: &str) -> Option<&str> {
    GO_VERSION
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
