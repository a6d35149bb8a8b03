//! Display and export helpers for calculation results
//!
//! Non-finite numbers render as "-" rather than "NaN" or "inf".

use std::io::Write;

use crate::error::CalcResult;
use crate::projection::InvestmentResult;

const MISSING: &str = "-";

/// `value` if finite, otherwise `fallback`
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Whole currency units with thousands separators, e.g. "1,234,568"
pub fn format_currency(value: f64) -> String {
    format_currency_with(value, 0)
}

pub fn format_currency_with(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }

    let digits = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    // Rounds-to-zero values print without a sign
    if value < 0.0 && digits.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Fraction as a percentage, e.g. 0.0525 -> "5.25%"
pub fn format_percent(rate: f64, decimals: usize) -> String {
    if !rate.is_finite() {
        return MISSING.to_string();
    }
    format!("{:.*}%", decimals, rate * 100.0)
}

/// Write the per-year breakdown as CSV with a header row
pub fn write_breakdown_csv<W: Write>(writer: W, result: &InvestmentResult) -> CalcResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &result.yearly_contributions {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the per-year breakdown and totals as an aligned text table
pub fn write_breakdown_table<W: Write>(out: &mut W, result: &InvestmentResult) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>4} {:>16} {:>18} {:>18} {:>9}",
        "Year", "Contributed", "Cum. Contributed", "Value at Horizon", "Share"
    )?;
    writeln!(out, "{}", "-".repeat(69))?;

    for row in &result.yearly_contributions {
        let share = if result.total_value != 0.0 {
            row.contribution / result.total_value
        } else {
            0.0
        };
        writeln!(
            out,
            "{:>4} {:>16} {:>18} {:>18} {:>9}",
            row.year,
            format_currency(row.annual_amount),
            format_currency(row.total_contributed),
            format_currency(row.current_value),
            format_percent(share, 2),
        )?;
    }

    let stats = result.performance_stats();
    writeln!(out)?;
    writeln!(out, "Compounding:       {}", result.mode)?;
    writeln!(out, "Total value:       {}", format_currency(result.total_value))?;
    writeln!(out, "Total contributed: {}", format_currency(result.total_contributed))?;
    writeln!(out, "Total profit:      {}", format_currency(result.total_profit))?;
    writeln!(out, "Profit rate:       {}", format_percent(result.profit_rate, 2))?;
    writeln!(out, "CAGR:              {}", format_percent(stats.compound_annual_growth_rate, 2))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::InvestmentParams;
    use crate::projection::calculate;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(999.4), "999");
        assert_eq!(format_currency(1_000.0), "1,000");
        assert_eq!(format_currency(11_999_880.0), "11,999,880");
        assert_eq!(format_currency(-1_234_567.6), "-1,234,568");
        assert_eq!(format_currency(-0.2), "0");
        assert_eq!(format_currency(f64::NAN), "-");
        assert_eq!(format_currency_with(1_234.5, 2), "1,234.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0525, 2), "5.25%");
        assert_eq!(format_percent(-0.1, 1), "-10.0%");
        assert_eq!(format_percent(f64::INFINITY, 2), "-");
    }

    #[test]
    fn test_finite_or() {
        assert_eq!(finite_or(1.5, 0.0), 1.5);
        assert_eq!(finite_or(f64::NAN, 0.0), 0.0);
        assert_eq!(finite_or(f64::NEG_INFINITY, 2.0), 2.0);
    }

    #[test]
    fn test_breakdown_csv() {
        let result = calculate(&InvestmentParams::new(1_000.0, 0.0, 2)).unwrap();
        let mut buf = Vec::new();
        write_breakdown_csv(&mut buf, &result).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "year,monthly_amount,annual_amount,total_contributed,current_value,contribution"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("2,1000.0,12000.0,24000.0"));
    }

    #[test]
    fn test_breakdown_table() {
        let result = calculate(&InvestmentParams::new(1_000.0, 0.05, 3)).unwrap();
        let mut buf = Vec::new();
        write_breakdown_table(&mut buf, &result).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Total contributed: 36,000"));
        assert!(text.contains("Compounding:       annual"));
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with('3')).count(), 1);
    }
}
