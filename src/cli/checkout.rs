use std::io;

use jiff::Zoned;
use vitrine::order::{Destination, WriterDispatcher};

use super::{Context, report_degraded};

pub(super) fn run(context: &Context) -> Result<(), String> {
    let destination = Destination::parse(&context.destination)
        .map_err(|error| format!("invalid order destination: {error}"))?;

    let mut session = context.session()?;
    let mut dispatcher = WriterDispatcher::new(io::stdout().lock());

    session
        .checkout(&mut dispatcher, &destination, Zoned::now().datetime())
        .map_err(|error| format!("checkout failed: {error}"))?;

    report_degraded(session.cart());

    Ok(())
}
