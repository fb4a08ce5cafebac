use crate::layout::{Block, PageLayout, Placed, layout_room, text_width_mm};
use crate::options::{DataPageOptions, pt_to_mm};
use crate::types::{Result, RoomData};
use printpdf::*;

pub const TIMESTAMP_FORMAT: &str = "%-d %B %Y at %H:%M";

pub fn format_timestamp<Tz>(time: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

pub fn current_timestamp() -> String {
    format_timestamp(&chrono::Local::now())
}

/// Render a room's data pages to PDF bytes
pub fn render_room_pdf(
    data: &RoomData,
    options: &DataPageOptions,
    timestamp: &str,
) -> Result<Vec<u8>> {
    options.validate()?;

    let layouts = layout_room(data, options);
    let page_count = layouts.len();
    let footer_left = printable(&data.room_name);
    let footer_centre = format!("Generated on {}", printable(timestamp));

    let mut doc = PdfDocument::new(&data.room_name);
    for (index, layout) in layouts.iter().enumerate() {
        let mut ops = page_ops(layout, options);
        let footer_right = format!("Page {} of {}", index + 1, page_count);
        ops.extend(footer_ops(
            options,
            [&footer_left, &footer_centre, &footer_right],
        ));
        doc.pages.push(PdfPage::new(
            Mm(options.page_width_mm),
            Mm(options.page_height_mm),
            ops,
        ));
    }

    log::debug!(
        "Rendered {} data page(s) for {}",
        page_count,
        data.room_name
    );

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    Ok(bytes)
}

// ============================================================================
// Drawing
// ============================================================================

const BORDER_GREY: f32 = 0.8;

/// Builtin fonts only cover Latin-1, so typographic punctuation is folded
/// to ASCII and anything else outside the range becomes '?'
fn printable(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            c if (c as u32) < 0x100 => c,
            _ => '?',
        })
        .collect()
}

fn point(x_mm: f32, y_from_top_mm: f32, options: &DataPageOptions) -> Point {
    Point {
        x: Mm(x_mm).into_pt(),
        y: Mm(options.page_height_mm - y_from_top_mm).into_pt(),
    }
}

fn text(ops: &mut Vec<Op>, pos: Point, size_pt: f32, font: BuiltinFont, content: &str) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor { pos });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size_pt),
        font,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(printable(content))],
        font,
    });
    ops.push(Op::EndTextSection);
}

fn outline(ops: &mut Vec<Op>, corners: [Point; 4]) {
    ops.push(Op::DrawLine {
        line: Line {
            points: corners
                .into_iter()
                .map(|p| LinePoint { p, bezier: false })
                .collect(),
            is_closed: true,
        },
    });
}

/// Baseline that vertically centres a line of text in a block
fn baseline_mm(placed: &Placed, size_pt: f32) -> f32 {
    placed.top_mm + placed.height_mm / 2.0 + pt_to_mm(size_pt) * 0.35
}

fn page_ops(layout: &PageLayout, options: &DataPageOptions) -> Vec<Op> {
    let mut ops = vec![
        Op::SetOutlineThickness { pt: Pt(0.5) },
        Op::SetOutlineColor {
            col: Color::Greyscale(Greyscale {
                percent: BORDER_GREY,
                icc_profile: None,
            }),
        },
    ];
    let left = options.margin_mm;

    for placed in &layout.blocks {
        match &placed.block {
            Block::Title(title) => {
                let size = options.title_font_size_pt;
                let pos = point(left, baseline_mm(placed, size), options);
                text(&mut ops, pos, size, BuiltinFont::HelveticaBold, title);
            }
            Block::Heading(heading) => {
                let size = options.heading_font_size_pt;
                let pos = point(left, baseline_mm(placed, size), options);
                text(&mut ops, pos, size, BuiltinFont::HelveticaBold, heading);
            }
            Block::Notice(notice) => {
                let size = options.body_font_size_pt;
                let pos = point(left, baseline_mm(placed, size), options);
                text(&mut ops, pos, size, BuiltinFont::Helvetica, notice);
            }
            Block::Row {
                cells,
                widths,
                header,
            } => {
                let size = options.body_font_size_pt;
                let font = if *header {
                    BuiltinFont::HelveticaBold
                } else {
                    BuiltinFont::Helvetica
                };
                let top = placed.top_mm;
                let bottom = top + placed.height_mm;
                let line_height = options.line_height_mm(size);
                let first_baseline = top
                    + options.cell_padding_mm
                    + line_height / 2.0
                    + pt_to_mm(size) * 0.35;

                let mut x = left;
                for (cell, width) in cells.iter().zip(widths) {
                    outline(
                        &mut ops,
                        [
                            point(x, top, options),
                            point(x + width, top, options),
                            point(x + width, bottom, options),
                            point(x, bottom, options),
                        ],
                    );
                    for (i, line) in cell.iter().enumerate() {
                        let baseline = first_baseline + i as f32 * line_height;
                        let pos = point(x + options.cell_padding_mm, baseline, options);
                        text(&mut ops, pos, size, font, line);
                    }
                    x += width;
                }
            }
        }
    }

    ops
}

/// Left, centre and right footer texts, set inside the bottom margin
fn footer_ops(options: &DataPageOptions, [left, centre, right]: [&String; 3]) -> Vec<Op> {
    let size = options.footer_font_size_pt;
    let y = options.page_height_mm - options.margin_mm / 2.0;
    let centre_x = (options.page_width_mm - text_width_mm(centre, size, false)) / 2.0;
    let right_x =
        options.page_width_mm - options.margin_mm - text_width_mm(right, size, false);

    let mut ops = Vec::new();
    text(&mut ops, point(options.margin_mm, y, options), size, BuiltinFont::Helvetica, left);
    text(&mut ops, point(centre_x, y, options), size, BuiltinFont::Helvetica, centre);
    text(&mut ops, point(right_x, y, options), size, BuiltinFont::Helvetica, right);
    ops
}
