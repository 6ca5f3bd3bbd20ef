//! PDF report of the current collection.
//!
//! Rendering needs the `report` feature (genpdf, on by default). The DejaVu
//! Sans regular and bold faces under `assets/fonts` are compiled in; setting
//! `REPORT_FONT_DIR` loads a `<name>-Regular.ttf`/`-Bold.ttf`/... family from
//! disk instead.

use std::path::PathBuf;

use pothole_core::pothole::StoredPothole;
use pothole_core::summary::Summary;

/// Content type of generated reports.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Report title.
pub const REPORT_TITLE: &str = "Pothole Repair Report";

/// Everything a report is built from.
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub records: Vec<StoredPothole>,
    pub summary: Summary,
    /// Stored board image, when one has been uploaded.
    pub board_image: Option<PathBuf>,
}

/// Font family used for rendering; `dir: None` means the embedded faces.
#[derive(Debug, Clone)]
pub struct ReportFonts {
    pub dir: Option<PathBuf>,
    pub name: String,
}

/// Table rows: number, width, length, area, coordinates (or `N/A`).
pub fn table_rows(records: &[StoredPothole]) -> Vec<[String; 5]> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let coordinates = match (r.x, r.y) {
                (Some(x), Some(y)) => format!("({x:.1}, {y:.1})"),
                _ => "N/A".to_string(),
            };
            [
                (i + 1).to_string(),
                format!("{:.2}", r.width),
                format!("{:.2}", r.length),
                format!("{:.2}", r.area),
                coordinates,
            ]
        })
        .collect()
}

pub const TABLE_HEADER: [&str; 5] = ["No.", "Width (m)", "Length (m)", "Area (m²)", "Coordinates (x, y)"];

#[cfg(feature = "report")]
mod pdf {
    use genpdf::elements::{Break, FrameCellDecorator, Image, Paragraph, TableLayout};
    use genpdf::fonts::{FontData, FontFamily};
    use genpdf::style::Style;
    use genpdf::{Alignment, Document, Element, SimplePageDecorator};

    use super::*;

    const REGULAR_TTF: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Regular.ttf");
    const BOLD_TTF: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

    fn err(e: impl std::fmt::Display) -> String {
        e.to_string()
    }

    /// Embedded faces; italics fall back to the upright ones.
    fn embedded_family() -> Result<FontFamily<FontData>, String> {
        let regular = FontData::new(REGULAR_TTF.to_vec(), None).map_err(err)?;
        let bold = FontData::new(BOLD_TTF.to_vec(), None).map_err(err)?;
        Ok(FontFamily {
            italic: regular.clone(),
            bold_italic: bold.clone(),
            regular,
            bold,
        })
    }

    fn font_family(fonts: &ReportFonts) -> Result<FontFamily<FontData>, String> {
        match &fonts.dir {
            Some(dir) => genpdf::fonts::from_files(dir, &fonts.name, None).map_err(err),
            None => embedded_family(),
        }
    }

    pub fn render(input: &ReportInput, fonts: &ReportFonts) -> Result<Vec<u8>, String> {
        let family = font_family(fonts)?;
        let mut doc = Document::new(family);
        doc.set_title(REPORT_TITLE);
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(
            Paragraph::new(REPORT_TITLE)
                .aligned(Alignment::Center)
                .styled(Style::new().bold().with_font_size(18)),
        );
        doc.push(Break::new(1));

        let mut table = TableLayout::new(vec![1, 2, 2, 2, 3]);
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
        let mut header = table.row();
        for title in TABLE_HEADER {
            header.push_element(Paragraph::new(title).styled(Style::new().bold()));
        }
        header.push().map_err(err)?;
        for row in table_rows(&input.records) {
            let mut cells = table.row();
            for cell in row {
                cells.push_element(Paragraph::new(cell).aligned(Alignment::Center));
            }
            cells.push().map_err(err)?;
        }
        doc.push(table);
        doc.push(Break::new(1));

        doc.push(Paragraph::new("Summary").styled(Style::new().bold().with_font_size(14)));
        for line in input.summary.lines() {
            doc.push(Paragraph::new(line));
        }

        if let Some(path) = &input.board_image {
            doc.push(Break::new(1));
            doc.push(
                Paragraph::new("Road image with potholes")
                    .styled(Style::new().bold().with_font_size(14)),
            );
            doc.push(Image::from_path(path).map_err(err)?.with_alignment(Alignment::Center));
        }

        let mut out = Vec::new();
        doc.render(&mut out).map_err(err)?;
        Ok(out)
    }
}

/// Render the report to PDF bytes.
#[cfg(feature = "report")]
pub fn render_pdf(input: &ReportInput, fonts: &ReportFonts) -> Result<Vec<u8>, String> {
    pdf::render(input, fonts)
}

/// Always fails: this build has no PDF backend.
#[cfg(not(feature = "report"))]
pub fn render_pdf(_input: &ReportInput, _fonts: &ReportFonts) -> Result<Vec<u8>, String> {
    Err("PDF reports are not enabled in this build".to_string())
}

/// Whether the PDF backend is compiled in.
pub const fn reports_enabled() -> bool {
    cfg!(feature = "report")
}

/// Regular face of an on-disk family, for startup diagnostics.
pub fn regular_font_path(fonts: &ReportFonts) -> Option<PathBuf> {
    fonts
        .dir
        .as_ref()
        .map(|dir| dir.join(format!("{}-Regular.ttf", fonts.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn rows_number_from_one_and_mark_missing_coordinates() {
        let records = [
            StoredPothole {
                width: 2.0,
                length: 3.0,
                area: 6.0,
                x: Some(390.0),
                y: Some(0.0),
            },
            StoredPothole {
                width: 10.0,
                length: 10.0,
                area: 100.0,
                x: None,
                y: None,
            },
        ];
        let rows = table_rows(&records);
        assert_eq!(rows[0], ["1", "2.00", "3.00", "6.00", "(390.0, 0.0)"].map(String::from));
        assert_eq!(rows[1][0], "2");
        assert_eq!(rows[1][4], "N/A");
    }

    #[test]
    fn font_path_follows_family_naming() {
        let fonts = ReportFonts {
            dir: Some("fonts".into()),
            name: "DejaVuSans".into(),
        };
        assert_eq!(
            regular_font_path(&fonts).as_deref(),
            Some(Path::new("fonts/DejaVuSans-Regular.ttf"))
        );
        let embedded = ReportFonts {
            dir: None,
            name: "DejaVuSans".into(),
        };
        assert_eq!(regular_font_path(&embedded), None);
    }

    #[cfg(feature = "report")]
    #[test]
    fn embedded_fonts_render_a_pdf() {
        let input = ReportInput {
            records: vec![StoredPothole {
                width: 2.0,
                length: 3.0,
                area: 6.0,
                x: None,
                y: None,
            }],
            summary: Summary::from_areas([6.0]),
            board_image: None,
        };
        let fonts = ReportFonts {
            dir: None,
            name: "DejaVuSans".into(),
        };
        let pdf = render_pdf(&input, &fonts).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
