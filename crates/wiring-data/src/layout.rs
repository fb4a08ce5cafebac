use crate::options::{DataPageOptions, pt_to_mm};
use crate::types::{RoomData, TabSection, ZoneTable};

// ============================================================================
// Text measurement
// ============================================================================

/// Approximate advance of Helvetica text. Builtin fonts carry no metrics
/// here so an average glyph width stands in for the real one.
pub fn text_width_mm(text: &str, font_size_pt: f32, bold: bool) -> f32 {
    let em = if bold { 0.58 } else { 0.53 };
    pt_to_mm(text.chars().count() as f32 * font_size_pt * em)
}

/// Break `text` into lines no wider than `width_mm`. Line breaks in the text
/// are kept and words wider than the column are split between characters.
pub fn wrap_text(text: &str, width_mm: f32, font_size_pt: f32, bold: bool) -> Vec<String> {
    let fits = |line: &str| text_width_mm(line, font_size_pt, bold) <= width_mm;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if fits(&candidate) {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for ch in word.chars() {
                line.push(ch);
                if !fits(&line) && line.chars().count() > 1 {
                    line.pop();
                    lines.push(std::mem::replace(&mut line, ch.to_string()));
                }
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}

/// Column widths in the manner of an auto-width table: natural widths when
/// they fit, otherwise every column keeps its longest word and the rest of
/// the page is shared out by how much more each column wants
pub fn column_widths(table: &ZoneTable, options: &DataPageOptions) -> Vec<f32> {
    let count = table.column_count();
    let padding = 2.0 * options.cell_padding_mm;
    let size = options.body_font_size_pt;

    let mut natural = vec![padding; count];
    let mut minimum = vec![padding; count];
    let mut measure = |i: usize, cell: &str, bold: bool| {
        let longest_line = cell
            .lines()
            .map(|line| text_width_mm(line.trim(), size, bold))
            .fold(0.0, f32::max);
        let longest_word = cell
            .split_whitespace()
            .map(|word| text_width_mm(word, size, bold))
            .fold(0.0, f32::max);
        natural[i] = natural[i].max(longest_line + padding);
        minimum[i] = minimum[i].max(longest_word + padding);
    };

    for (i, cell) in table.header.iter().enumerate() {
        measure(i, cell, true);
    }
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            measure(i, cell, false);
        }
    }

    let available = options.content_width_mm();
    let total: f32 = natural.iter().sum();
    if total <= available {
        return natural;
    }

    let floor: f32 = minimum.iter().sum();
    if floor >= available {
        let scale = available / floor;
        return minimum.iter().map(|w| w * scale).collect();
    }

    let spare = available - floor;
    let wanted = total - floor;
    minimum
        .iter()
        .zip(&natural)
        .map(|(min, nat)| min + (nat - min) * spare / wanted)
        .collect()
}

// ============================================================================
// Page layout
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Notice(String),
    /// One table row. Each cell holds its wrapped lines.
    Row {
        cells: Vec<Vec<String>>,
        widths: Vec<f32>,
        header: bool,
    },
}

/// A block positioned on a page, measured from the top edge
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub block: Block,
    pub top_mm: f32,
    pub height_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub blocks: Vec<Placed>,
}

struct Pager<'a> {
    options: &'a DataPageOptions,
    pages: Vec<PageLayout>,
    current: PageLayout,
    cursor_mm: f32,
}

impl<'a> Pager<'a> {
    fn new(options: &'a DataPageOptions) -> Self {
        Self {
            options,
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor_mm: options.margin_mm,
        }
    }

    /// Start a new page unless `height_mm` still fits. Returns true on a break.
    fn reserve(&mut self, height_mm: f32) -> bool {
        let fits = self.cursor_mm + height_mm <= self.options.body_bottom_mm();
        if fits || self.current.blocks.is_empty() {
            return false;
        }
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor_mm = self.options.margin_mm;
        true
    }

    fn place(&mut self, block: Block, height_mm: f32) -> bool {
        let broke = self.reserve(height_mm);
        self.current.blocks.push(Placed {
            block,
            top_mm: self.cursor_mm,
            height_mm,
        });
        self.cursor_mm += height_mm;
        broke
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.current.blocks.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn wrap_cells(
    cells: &[String],
    widths: &[f32],
    header: bool,
    options: &DataPageOptions,
) -> Vec<Vec<String>> {
    let padding = 2.0 * options.cell_padding_mm;
    widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let text = cells.get(i).map(String::as_str).unwrap_or("");
            wrap_text(text, width - padding, options.body_font_size_pt, header)
        })
        .collect()
}

fn line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(0)
}

/// Cut a row into pieces of at most `max_lines` lines so that no piece is
/// taller than a page
fn split_row(cells: Vec<Vec<String>>, max_lines: usize) -> Vec<Vec<Vec<String>>> {
    let lines = line_count(&cells);
    if lines <= max_lines {
        return vec![cells];
    }

    (0..lines)
        .step_by(max_lines)
        .map(|start| {
            cells
                .iter()
                .map(|cell| cell.iter().skip(start).take(max_lines).cloned().collect())
                .collect()
        })
        .collect()
}

fn place_table(pager: &mut Pager, tab: &str, table: &ZoneTable) {
    let options = pager.options;
    let widths = column_widths(table, options);

    let header_cells = wrap_cells(&table.header, &widths, true, options);
    let header_height = options.row_height_mm(line_count(&header_cells));
    let header = Block::Row {
        cells: header_cells,
        widths: widths.clone(),
        header: true,
    };

    // Lines a body row may use on a page that opens with the header
    let line_height = options.line_height_mm(options.body_font_size_pt);
    let free = options.body_bottom_mm()
        - options.margin_mm
        - header_height
        - 2.0 * options.cell_padding_mm;
    let max_lines = ((free / line_height).floor() as usize).max(1);

    let rows: Vec<Vec<Vec<String>>> = table
        .rows
        .iter()
        .flat_map(|row| split_row(wrap_cells(row, &widths, false, options), max_lines))
        .collect();

    // Keep the heading with the header and first row
    let first_row = rows
        .first()
        .map_or(0.0, |cells| options.row_height_mm(line_count(cells)));
    pager.reserve(options.heading_height_mm() + header_height + first_row);
    pager.place(Block::Heading(tab.to_string()), options.heading_height_mm());

    if widths.is_empty() {
        return;
    }

    pager.place(header.clone(), header_height);

    for cells in rows {
        let height = options.row_height_mm(line_count(&cells));
        if pager.reserve(height) {
            pager.place(header.clone(), header_height);
        }
        pager.place(
            Block::Row {
                cells,
                widths: widths.clone(),
                header: false,
            },
            height,
        );
    }
}

/// Lay a room's data out over as many pages as it needs. Always yields at
/// least one page.
pub fn layout_room(data: &RoomData, options: &DataPageOptions) -> Vec<PageLayout> {
    let mut pager = Pager::new(options);
    pager.place(
        Block::Title(data.room_name.clone()),
        options.title_height_mm(),
    );

    for section in &data.sections {
        match section {
            TabSection::Table { tab, table } => place_table(&mut pager, tab, table),
            other => {
                if let Some(notice) = other.notice() {
                    pager.place(Block::Notice(notice), options.notice_height_mm());
                }
            }
        }
    }

    pager.finish()
}
