/// Render a left-aligned table: header line, dashed divider, one line per row.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect();

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_line = line(headers.to_vec());
    let divider = "-".repeat(header_line.chars().count());

    let mut out = vec![header_line, divider];
    out.extend(rows.iter().map(|row| {
        line(
            (0..headers.len())
                .map(|index| row.get(index).map_or("-", String::as_str))
                .collect(),
        )
    }));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::render;

    #[test]
    fn columns_align_to_widest_cell() {
        let rows = vec![
            vec!["listing".to_string(), "1".to_string()],
            vec!["photo".to_string(), "12".to_string()],
        ];
        let out = render(&["scope", "records"], &rows);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "scope    records");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "listing  1");
        assert_eq!(lines[3], "photo    12");
    }

    #[test]
    fn short_rows_fill_with_dash() {
        let out = render(&["a", "b"], &[vec!["x".to_string()]]);
        assert_eq!(out.lines().nth(2), Some("x  -"));
    }
}
