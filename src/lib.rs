mod error;
pub mod model;
pub mod nroff;
pub mod rfcxml;
pub mod wrap;

pub use error::Error;

use std::path::Path;
use std::time::Instant;

pub fn convert_xml_to_nroff(input: &Path, output: &Path) -> Result<(), Error> {
    let t0 = Instant::now();

    let doc = rfcxml::parse(input)?;
    let t_parse = t0.elapsed();

    let text = nroff::render(&doc);
    let t_render = t0.elapsed();

    std::fs::write(output, &text).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        text.len(),
    );

    Ok(())
}

pub fn render_str(xml: &str) -> Result<String, Error> {
    let doc = rfcxml::parse_str(xml)?;
    Ok(nroff::render(&doc))
}
