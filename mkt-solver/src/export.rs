use crate::{Analysis, Market};
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::{Level, event};

/// The header row of the exported table
pub const HEADER: &str = "Quantity,DemandPrice,SupplyPriceWithTax";

/// How far past the equilibrium quantity the table extends
pub const EXTENT: f64 = 1.5;

/// The largest table that will be written, in data rows
pub const MAX_ROWS: u64 = 1_000_000;

/// The number of data rows the table for this analysis holds.
///
/// Quantities run from 0 to `floor(1.5 * Q*)` inclusive.
pub fn row_count(analysis: &Analysis) -> u64 {
    (analysis.quantity * EXTENT).floor() as u64 + 1
}

// Refuse tables beyond MAX_ROWS before anything is written
fn check_extent(analysis: &Analysis) -> Result<u64, std::io::Error> {
    let rows = row_count(analysis);
    if rows > MAX_ROWS {
        event!(
            Level::WARN,
            quantity = analysis.quantity,
            rows,
            max_rows = MAX_ROWS,
            "table too large to export"
        );
        return Err(std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("table would have {rows} rows, more than the limit of {MAX_ROWS}"),
        ));
    }
    Ok(rows)
}

/// Tabulate both curves around an equilibrium as comma-separated values.
///
/// Rows run from quantity 0 up to `1.5 * Q*` inclusive in unit steps. Each
/// row holds the quantity, the demand price, and the supply price including
/// the tax, all with two decimals. Returns the number of data rows written.
///
/// Fails with [`ErrorKind::InvalidInput`] without writing anything if the
/// table would exceed [`MAX_ROWS`].
pub fn write_table(
    market: &Market,
    analysis: &Analysis,
    buffer: &mut impl Write,
) -> Result<usize, std::io::Error> {
    let rows = check_extent(analysis)?;

    writeln!(buffer, "{HEADER}")?;

    // Stepping by integer index avoids accumulating float error in the quantity
    for quantity in (0..rows).map(|i| i as f64) {
        let demand = market.demand().evaluate(quantity);
        let supply = market.supply().evaluate(quantity) + analysis.tax;
        writeln!(buffer, "{quantity:.2},{demand:.2},{supply:.2}")?;
    }

    Ok(rows as usize)
}

/// Write the table from [`write_table`] to a file, replacing any existing file.
///
/// The file handle is released on every path, including when a write fails.
/// An oversized table is rejected before the file is created.
pub fn export_csv(
    market: &Market,
    analysis: &Analysis,
    path: impl AsRef<Path>,
) -> Result<usize, std::io::Error> {
    check_extent(analysis)?;

    let mut buffer = BufWriter::new(File::create(path)?);
    let rows = write_table(market, analysis, &mut buffer)?;
    // Flush explicitly, as errors on drop are swallowed
    buffer.flush()?;
    Ok(rows)
}
