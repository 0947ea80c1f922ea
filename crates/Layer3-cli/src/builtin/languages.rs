//! `languages` - 언어 런타임 probe들이 채우는 상위 mapping

use hostfacts_core::{PluginFragment, PluginRegistry};
use hostfacts_foundation::Result;
use serde_json::json;

pub fn register(registry: &PluginRegistry) -> Result<()> {
    registry.load(
        "Languages",
        PluginFragment::v7()
            .source("builtin/languages")
            .provides(["languages"])
            .collect_data(|ctx| {
                if !ctx.attribute("languages") {
                    ctx.set_attribute("languages", json!({}));
                }
                Ok(())
            }),
    )?;
    Ok(())
}
