//! Streams command implementation

use anyhow::Result;
use watchtower::store_status;

use super::Context;
use crate::output::print_stream_table;

pub fn execute(ctx: &Context) -> Result<()> {
    let config = ctx.validate()?;
    print_stream_table(&store_status(&config));
    Ok(())
}
