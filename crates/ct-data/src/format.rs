//! Row writers for the DAT and CSV exports.

use chrono::DateTime;
use ct_core::format_g;

use crate::data::Data;
use crate::error::{DataError, DataResult};

/// Writes a table one cell at a time.
///
/// Every row starts with [`Format::write_time`] and is followed by one
/// value or skip per series.
pub trait Format {
    fn write_header(&self, out: &mut String, data: &Data<'_>);
    fn write_time(&self, out: &mut String, t: f64) -> DataResult<()>;
    fn write_value(&self, out: &mut String, v: f64);
    fn skip_value(&self, out: &mut String);
}

/// Tab separated, gnuplot style comments in the header.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dat;

impl Format for Dat {
    fn write_header(&self, out: &mut String, data: &Data<'_>) {
        if data.time_is_date {
            out.push_str("#time is unix date\n");
        }
        out.push_str(&format!("#time[{}]", data.time_unit));
        for c in &data.content {
            out.push_str(&format!("\t{}[{}]", c.name, c.unit));
        }
    }

    fn write_time(&self, out: &mut String, t: f64) -> DataResult<()> {
        out.push('\n');
        out.push_str(&format_g(t));
        Ok(())
    }

    fn write_value(&self, out: &mut String, v: f64) {
        out.push('\t');
        out.push_str(&format_g(v));
    }

    fn skip_value(&self, out: &mut String) {
        out.push_str("\t-");
    }
}

/// Comma separated with every field quoted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Csv {
    /// Split the time column into UTC date and time of day.
    pub is_date: bool,
}

const CSV_DATE_FORMAT: &str = "%Y-%m-%d";
const CSV_TIME_FORMAT: &str = "%H:%M:%S";

impl Format for Csv {
    fn write_header(&self, out: &mut String, data: &Data<'_>) {
        if data.time_is_date {
            out.push_str("\"date\",\"time\"");
        } else {
            out.push_str(&format!("\"time[{}]\"", data.time_unit));
        }
        for c in &data.content {
            out.push_str(&format!(",\"{}[{}]\"", c.name, c.unit));
        }
    }

    fn write_time(&self, out: &mut String, t: f64) -> DataResult<()> {
        if !self.is_date {
            out.push_str(&format!("\n\"{}\"", format_g(t)));
            return Ok(());
        }

        let sec = t.floor();
        let nsec = ((t - sec) * 1e9) as u32;
        let date = if sec.is_finite() {
            DateTime::from_timestamp(sec as i64, nsec.min(999_999_999))
        } else {
            None
        };
        let date = date.ok_or(DataError::InvalidDate { value: t })?;
        out.push_str(&format!(
            "\n\"{}\",\"{}\"",
            date.format(CSV_DATE_FORMAT),
            date.format(CSV_TIME_FORMAT)
        ));
        Ok(())
    }

    fn write_value(&self, out: &mut String, v: f64) {
        out.push_str(&format!(",\"{}\"", format_g(v)));
    }

    fn skip_value(&self, out: &mut String) {
        out.push_str(",\"\"");
    }
}
