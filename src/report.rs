//! Summary table of the generated derivatives, shown with --report

use prettytable::{format, Cell, Row, Table};
use std::path::Path;

use crate::image_processing::ProcessingResult;
use crate::utils::format_duration;

#[derive(Debug, Default)]
pub struct ProcessingReport {
    entries: Vec<ProcessingResult>,
}

impl ProcessingReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: ProcessingResult) {
        self.entries.push(result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        table.add_row(Row::new(vec![
            Cell::new("Input"),
            Cell::new("Background"),
            Cell::new("View"),
            Cell::new("Item"),
            Cell::new("Landscape"),
            Cell::new("Portrait"),
            Cell::new("Time"),
        ]));

        for entry in &self.entries {
            let mut cells = vec![
                Cell::new(&truncate(&file_name(&entry.input_path), 30)),
                Cell::new(if entry.white_background { "white" } else { "photo" }),
            ];
            for (_, path) in &entry.outputs {
                cells.push(Cell::new(&file_name(path)));
            }
            cells.push(Cell::new(&format_duration(entry.processing_time)));
            table.add_row(Row::new(cells));
        }

        table
    }

    /// Print the report as a formatted table
    pub fn print(&self) {
        if self.entries.is_empty() {
            return;
        }
        println!("\n📷 GENERATED IMAGES ({} sources)\n", self.entries.len());
        self.table().printstd();
        println!();
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Truncate string to max length, keeping the end (the part that differs)
fn truncate(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_processing::derivatives::Derivative;
    use std::path::PathBuf;
    use std::time::Duration;

    fn result(name: &str, white: bool) -> ProcessingResult {
        ProcessingResult {
            input_path: PathBuf::from(format!("shop/{}.jpg", name)),
            outputs: vec![
                (Derivative::View, PathBuf::from(format!("shop/{}v.jpg", name))),
                (Derivative::Item, PathBuf::from(format!("shop/{}b.jpg", name))),
                (Derivative::Landscape, PathBuf::from(format!("shop/{}m.jpg", name))),
                (Derivative::Portrait, PathBuf::from(format!("shop/{}n.jpg", name))),
            ],
            white_background: white,
            processing_time: Duration::from_millis(1200),
        }
    }

    #[test]
    fn test_table_rows() {
        let mut report = ProcessingReport::new();
        assert!(report.is_empty());
        report.add(result("rose", true));
        report.add(result("tulip", false));
        assert_eq!(report.len(), 2);

        let table = report.table();
        // header + one row per source
        assert_eq!(table.len(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains("rosem.jpg"));
        assert!(rendered.contains("tulipn.jpg"));
        assert!(rendered.contains("white"));
        assert!(rendered.contains("1.200s"));
    }

    #[test]
    fn test_truncate_keeps_tail() {
        assert_eq!(truncate("short.jpg", 20), "short.jpg");
        assert_eq!(truncate("a_very_long_product_name.jpg", 12), "..._name.jpg");
    }
}
