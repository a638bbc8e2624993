//! SVG surface — accumulates SVG elements per render unit and produces one
//! self-contained document for each `begin_render`/`end_render` pair.

use std::fmt::Write as _;

use super::music_font::MUSIC_FONT_SIZE;
use super::{Canvas, MusicFontSymbol, TextAlign};
use crate::settings::{Color, Font, RenderingResources};

pub struct SvgCanvas {
    elements: Vec<String>,
    documents: Vec<String>,
    width: f64,
    height: f64,
    path: String,
    color: Color,
    line_width: f64,
    font: Font,
    text_align: TextAlign,
    music_font_family: String,
}

impl Default for SvgCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::with_resources(&RenderingResources::default())
    }

    pub fn with_resources(resources: &RenderingResources) -> Self {
        Self {
            elements: Vec::new(),
            documents: Vec::new(),
            width: 0.0,
            height: 0.0,
            path: String::new(),
            color: resources.main_glyph_color,
            line_width: 1.0,
            font: Font::default(),
            text_align: TextAlign::Left,
            music_font_family: resources.music_font_family.clone(),
        }
    }

    /// Finished documents, one per render unit, in paint order.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<String> {
        self.documents
    }

    fn build(&mut self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in self.elements.drain(..) {
            svg.push_str("  ");
            svg.push_str(&el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn anchor(&self) -> &'static str {
        match self.text_align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        }
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Canvas for SvgCanvas {
    fn begin_render(&mut self, width: f64, height: f64) {
        self.elements.clear();
        self.path.clear();
        self.width = width;
        self.height = height;
    }

    fn end_render(&mut self) {
        let doc = self.build();
        self.documents.push(doc);
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn line_width(&self) -> f64 {
        self.line_width
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn font(&self) -> &Font {
        &self.font
    }

    fn set_font(&mut self, font: &Font) {
        self.font = font.clone();
    }

    fn text_align(&self) -> TextAlign {
        self.text_align
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "M{:.2},{:.2} ", x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "L{:.2},{:.2} ", x, y);
    }

    fn close_path(&mut self) {
        self.path.push_str("Z ");
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.2}"/>"#,
            self.path.trim_end(),
            self.color.to_css(),
            self.line_width
        ));
        self.path.clear();
    }

    fn fill(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            r#"<path d="{}" fill="{}" stroke="none"/>"#,
            self.path.trim_end(),
            self.color.to_css()
        ));
        self.path.clear();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.elements.push(format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            x,
            y,
            width,
            height,
            self.color.to_css()
        ));
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
            x,
            y,
            radius,
            self.color.to_css()
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let weight = if self.font.is_bold() { "bold" } else { "normal" };
        let style = if self.font.is_italic() { "italic" } else { "normal" };
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" font-weight="{}" font-style="{}" fill="{}" text-anchor="{}">{}</text>"#,
            x,
            y,
            escape(&self.font.family),
            self.font.size,
            weight,
            style,
            self.color.to_css(),
            self.anchor(),
            escape(text)
        ));
    }

    fn fill_music_font_symbol(
        &mut self,
        x: f64,
        y: f64,
        scale: f64,
        symbol: MusicFontSymbol,
        center_at_position: bool,
    ) {
        let x = if center_at_position {
            x - symbol.width() * scale / 2.0
        } else {
            x
        };
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}">&#x{:X};</text>"#,
            x,
            y,
            escape(&self.music_font_family),
            MUSIC_FONT_SIZE * scale,
            self.color.to_css(),
            symbol.code_point()
        ));
    }
}
