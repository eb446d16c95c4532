//! Descriptive statistics over numeric series
//!
//! Missing values are skipped; correlations use pairwise-complete rows.

use std::fmt;

use serde::Serialize;

/// Summary of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

fn present(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// Linear-interpolated quantile of sorted values
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut sorted = present(values);
    sorted.sort_by(f64::total_cmp);
    quantile(&sorted, 0.5)
}

pub fn describe(values: &[Option<f64>]) -> Describe {
    let mut sorted = present(values);
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len();

    let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|m| {
        let ss: f64 = sorted.iter().map(|v| (v - m).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });

    Describe {
        count,
        mean,
        std,
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Pearson correlation over rows where both values are present
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// Square correlation matrix over named series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        self.values[i][j]
    }
}

pub fn correlation_matrix(series: &[(&str, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let values = series
        .iter()
        .map(|(_, a)| series.iter().map(|(_, b)| pearson(a, b)).collect())
        .collect();

    CorrelationMatrix {
        columns: series.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{:.6}", v))
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.columns.iter().map(|c| c.len()).max().unwrap_or(0).max(10);

        write!(f, "{:width$}", "", width = width)?;
        for column in &self.columns {
            write!(f, "  {:>width$}", column, width = width)?;
        }
        writeln!(f)?;

        for (name, row) in self.columns.iter().zip(&self.values) {
            write!(f, "{:width$}", name, width = width)?;
            for value in row {
                write!(f, "  {:>width$}", cell(*value), width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Render describe() for several columns side by side
pub fn describe_table(series: &[(&str, Vec<Option<f64>>)]) -> String {
    let summaries: Vec<(&str, Describe)> = series
        .iter()
        .map(|(name, values)| (*name, describe(values)))
        .collect();
    let width = series.iter().map(|(n, _)| n.len()).max().unwrap_or(0).max(12);

    let mut out = format!("{:6}", "");
    for (name, _) in &summaries {
        out.push_str(&format!("  {:>width$}", name, width = width));
    }
    out.push('\n');

    let rows: [(&str, fn(&Describe) -> Option<f64>); 8] = [
        ("count", |d| Some(d.count as f64)),
        ("mean", |d| d.mean),
        ("std", |d| d.std),
        ("min", |d| d.min),
        ("25%", |d| d.q25),
        ("50%", |d| d.median),
        ("75%", |d| d.q75),
        ("max", |d| d.max),
    ];
    for (label, pick) in rows {
        out.push_str(&format!("{:6}", label));
        for (_, summary) in &summaries {
            out.push_str(&format!("  {:>width$}", cell(pick(summary)), width = width));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_skips_missing() {
        let d = describe(&[Some(1.0), None, Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(d.count, 4);
        assert_eq!(d.mean, Some(2.5));
        assert_eq!(d.min, Some(1.0));
        assert_eq!(d.max, Some(4.0));
        assert_eq!(d.median, Some(2.5));
        assert_eq!(d.q25, Some(1.75));
        assert_eq!(d.q75, Some(3.25));
        let std = d.std.unwrap();
        assert!((std - 1.2909944).abs() < 1e-6);
    }

    #[test]
    fn test_describe_empty_and_single() {
        let empty = describe(&[None, None]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.median, None);

        let single = describe(&[Some(7.0)]);
        assert_eq!(single.mean, Some(7.0));
        assert_eq!(single.std, None);
    }

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[Some(3.0), Some(1.0), Some(2.0)]), Some(2.0));
        assert_eq!(median(&[Some(4.0), Some(1.0), None, Some(2.0), Some(3.0)]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_pearson() {
        let a = vec![Some(1.0), Some(2.0), Some(3.0), None];
        let b = vec![Some(2.0), Some(4.0), Some(6.0), Some(100.0)];
        let c = vec![Some(3.0), Some(2.0), Some(1.0), Some(0.0)];

        assert!((pearson(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&a, &c).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&a, &[Some(1.0), Some(1.0), Some(1.0), None]), None);
    }

    #[test]
    fn test_correlation_matrix() {
        let series = vec![
            ("Age", vec![Some(30.0), Some(40.0), Some(50.0)]),
            ("Weight", vec![Some(60.0), Some(70.0), Some(90.0)]),
        ];
        let matrix = correlation_matrix(&series);

        assert_eq!(matrix.columns, vec!["Age", "Weight"]);
        assert!((matrix.get("Age", "Age").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("Age", "Weight"), matrix.get("Weight", "Age"));
        assert!(matrix.to_string().contains("Weight"));
    }

    #[test]
    fn test_describe_table_layout() {
        let table = describe_table(&[("Age", vec![Some(1.0), Some(3.0)])]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[1].starts_with("count"));
        assert!(lines[2].contains("2.000000"));
    }
}
