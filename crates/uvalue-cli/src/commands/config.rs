//! Config command implementation

use super::CommandEnv;
use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;

pub fn execute(env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    let mut rows: Vec<ConfigRow> = env
        .config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow {
            key,
            value,
            source: format!("{:?}", source),
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    if !output.is_json() {
        output.section("Effective Configuration");
    }
    output.table(rows);

    if let Err(e) = env.config.validate() {
        output.warning(e);
    }
    Ok(())
}
