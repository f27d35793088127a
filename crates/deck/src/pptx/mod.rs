//! Serializes a [`Deck`] as an OOXML presentation package: a zip archive
//! holding the content-type map, package relationships, the presentation
//! part (with its section list), a single blank master/layout/theme chain
//! and one part per slide.

mod parts;

use std::io::{Seek, Write};

use anyhow::Result;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::model::{Align, Anchor, Bullet, Deck, Shape, Slide, SlideTable, Strike, TextBox, TextRun};
use parts::escape;

// Slide geometry in EMU (16:9, 10 by 5.625 inches).
const SLIDE_WIDTH: u64 = 9_144_000;
const SLIDE_HEIGHT: u64 = 5_143_500;
// Body boxes are inset a tenth of an inch and fill 95% of the slide.
const BODY_INSET: u64 = 91_440;
const BODY_WIDTH: u64 = SLIDE_WIDTH / 100 * 95;
const BODY_HEIGHT: u64 = SLIDE_HEIGHT / 100 * 95;
const TABLE_X: u64 = 457_200;
const TABLE_Y: u64 = 914_400;
const TABLE_WIDTH: u64 = SLIDE_WIDTH - 2 * TABLE_X;
const ROW_HEIGHT: u64 = 370_840;

#[derive(Clone, Copy, Debug, Default)]
pub struct PptxWriter;

impl PptxWriter {
    pub fn new() -> Self {
        PptxWriter
    }

    /// Write the whole package. Part names and relationship ids are fixed;
    /// only slide parts vary with the deck.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        write_part(
            &mut zip,
            "[Content_Types].xml",
            &parts::content_types(deck.slides.len()),
            options,
        )?;
        write_part(&mut zip, "_rels/.rels", parts::ROOT_RELS, options)?;
        write_part(
            &mut zip,
            "docProps/core.xml",
            &parts::core_properties(deck.title.as_deref()),
            options,
        )?;
        write_part(
            &mut zip,
            "ppt/presentation.xml",
            &presentation_xml(deck),
            options,
        )?;
        write_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels(deck.slides.len()),
            options,
        )?;
        write_part(
            &mut zip,
            "ppt/slideMasters/slideMaster1.xml",
            parts::SLIDE_MASTER,
            options,
        )?;
        write_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::SLIDE_MASTER_RELS,
            options,
        )?;
        write_part(
            &mut zip,
            "ppt/slideLayouts/slideLayout1.xml",
            parts::SLIDE_LAYOUT,
            options,
        )?;
        write_part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            parts::SLIDE_LAYOUT_RELS,
            options,
        )?;
        write_part(&mut zip, "ppt/theme/theme1.xml", parts::THEME, options)?;

        for (idx, slide) in deck.slides.iter().enumerate() {
            let n = idx + 1;
            write_part(
                &mut zip,
                &format!("ppt/slides/slide{}.xml", n),
                &slide_xml(slide),
                options,
            )?;
            write_part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                parts::SLIDE_RELS,
                options,
            )?;
        }

        zip.finish()?;
        Ok(())
    }
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    content: &str,
    options: FileOptions,
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn presentation_xml(deck: &Deck) -> String {
    let mut slide_ids = String::new();
    for idx in 0..deck.slides.len() {
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + idx,
            idx + 2
        ));
    }
    format!(
        r#"{}<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>{}</p:presentation>"#,
        parts::XML_DECL,
        parts::NS_P,
        slide_ids,
        SLIDE_WIDTH,
        SLIDE_HEIGHT,
        section_list_xml(&deck.slides)
    )
}

/// Consecutive slides sharing a section name form one entry of the section
/// list extension.
fn section_list_xml(slides: &[Slide]) -> String {
    if slides.is_empty() {
        return String::new();
    }
    let mut sections: Vec<(&str, Vec<usize>)> = Vec::new();
    for (idx, slide) in slides.iter().enumerate() {
        match sections.last_mut() {
            Some((name, ids)) if *name == slide.section => ids.push(idx),
            _ => sections.push((slide.section.as_str(), vec![idx])),
        }
    }

    let mut xml = String::new();
    for (num, (name, ids)) in sections.iter().enumerate() {
        let mut id_list = String::new();
        for idx in ids {
            id_list.push_str(&format!(r#"<p14:sldId id="{}"/>"#, 256 + idx));
        }
        xml.push_str(&format!(
            r#"<p14:section name="{}" id="{{{:08X}-0000-0000-0000-000000000000}}"><p14:sldIdLst>{}</p14:sldIdLst></p14:section>"#,
            escape(name),
            num + 1,
            id_list
        ));
    }
    format!(
        r#"<p:extLst><p:ext uri="{{521415D9-36F7-43E2-AB2F-B90AF26B5E84}}"><p14:sectionLst xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main">{}</p14:sectionLst></p:ext></p:extLst>"#,
        xml
    )
}

fn slide_xml(slide: &Slide) -> String {
    let mut shapes = String::new();
    let mut id = 2u32;
    for shape in &slide.shapes {
        match shape {
            Shape::Text(text_box) => shapes.push_str(&text_shape_xml(text_box, id)),
            Shape::Table(table) => shapes.push_str(&table_shape_xml(table, id)),
        }
        id += 1;
    }
    format!(
        r#"{}<p:sld {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        parts::XML_DECL,
        parts::NS_P,
        shapes
    )
}

fn text_shape_xml(text_box: &TextBox, id: u32) -> String {
    let (x, y, cx, cy) = match text_box.style.anchor {
        Anchor::Middle => (0, 0, SLIDE_WIDTH, SLIDE_HEIGHT),
        Anchor::Top => (BODY_INSET, BODY_INSET, BODY_WIDTH, BODY_HEIGHT),
    };
    let anchor = match text_box.style.anchor {
        Anchor::Middle => "ctr",
        Anchor::Top => "t",
    };
    let align = match text_box.style.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    let paragraphs = paragraphs_xml(
        &text_box.runs,
        Some(align),
        text_box.style.rtl,
        text_box.style.bold,
        text_box.style.font_size,
        Some(&text_box.style.lang),
    );
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="TextBox {}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square" anchor="{}"/><a:lstStyle/>{}</p:txBody></p:sp>"#,
        id,
        id - 1,
        x,
        y,
        cx,
        cy,
        anchor,
        paragraphs
    )
}

fn table_shape_xml(table: &SlideTable, id: u32) -> String {
    let cols = table.column_count().max(1);
    let col_width = TABLE_WIDTH / cols as u64;
    let mut grid = String::new();
    for _ in 0..cols {
        grid.push_str(&format!(r#"<a:gridCol w="{}"/>"#, col_width));
    }

    let mut rows = String::new();
    for row in &table.rows {
        let mut cells = String::new();
        for cell in row {
            let paragraphs = paragraphs_xml(&cell.runs, None, true, false, None, None);
            cells.push_str(&format!(
                r#"<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>{}</a:txBody><a:tcPr/></a:tc>"#,
                paragraphs
            ));
        }
        rows.push_str(&format!(r#"<a:tr h="{}">{}</a:tr>"#, ROW_HEIGHT, cells));
    }

    let height = ROW_HEIGHT * table.row_count() as u64;
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{}" name="Table {}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>{}</a:tblGrid>{}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#,
        id,
        id - 1,
        TABLE_X,
        TABLE_Y,
        TABLE_WIDTH,
        height,
        grid,
        rows
    )
}

/// Group runs into paragraphs at trailing-break boundaries. `"\n"` runs
/// become explicit breaks inside the current paragraph.
fn paragraphs_xml(
    runs: &[TextRun],
    align: Option<&str>,
    rtl: bool,
    box_bold: bool,
    font_size: Option<u32>,
    lang: Option<&str>,
) -> String {
    let mut paragraphs = String::new();
    let mut body = String::new();
    let mut first: Option<&TextRun> = None;

    for run in runs {
        if first.is_none() {
            first = Some(run);
        }
        if run.text == "\n" {
            body.push_str("<a:br/>");
        } else {
            body.push_str(&run_xml(run, box_bold, font_size, lang));
        }
        if run.break_after {
            paragraphs.push_str(&paragraph_xml(&body, first, align, rtl));
            body.clear();
            first = None;
        }
    }
    if first.is_some() {
        paragraphs.push_str(&paragraph_xml(&body, first, align, rtl));
    }
    if paragraphs.is_empty() {
        paragraphs.push_str("<a:p/>");
    }
    paragraphs
}

fn paragraph_xml(runs_xml: &str, first: Option<&TextRun>, align: Option<&str>, rtl: bool) -> String {
    let mut attrs = String::new();
    let mut bullet = String::new();
    if let Some(first) = first {
        if let Some(lvl) = first.indent_level {
            attrs.push_str(&format!(r#" lvl="{}""#, lvl));
        }
        match first.bullet {
            Some(Bullet::Marker) => {
                bullet.push_str(r#"<a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#)
            }
            Some(Bullet::Numbered { start_at }) => bullet.push_str(&format!(
                r#"<a:buFont typeface="+mj-lt"/><a:buAutoNum type="arabicPeriod" startAt="{}"/>"#,
                start_at
            )),
            None => {}
        }
    }
    if let Some(align) = align {
        attrs.push_str(&format!(r#" algn="{}""#, align));
    }
    // a paragraph led by a left-to-right run (code) opts out of the box
    // direction; bare break paragraphs keep it
    if rtl && first.map_or(true, |r| r.rtl || r.text == "\n") {
        attrs.push_str(r#" rtl="1""#);
    }
    format!("<a:p><a:pPr{}>{}</a:pPr>{}</a:p>", attrs, bullet, runs_xml)
}

fn run_xml(run: &TextRun, box_bold: bool, font_size: Option<u32>, lang: Option<&str>) -> String {
    let mut props = String::new();
    if let Some(lang) = lang {
        props.push_str(&format!(r#" lang="{}""#, escape(lang)));
    }
    if let Some(sz) = font_size {
        props.push_str(&format!(r#" sz="{}""#, sz * 100));
    }
    if run.bold || box_bold {
        props.push_str(r#" b="1""#);
    }
    if run.italic {
        props.push_str(r#" i="1""#);
    }
    if let Some(Strike::Single) = run.strike {
        props.push_str(r#" strike="sngStrike""#);
    }
    let font = run
        .font_face
        .as_deref()
        .map(|face| format!(r#"<a:latin typeface="{}"/>"#, escape(face)))
        .unwrap_or_default();
    format!(
        "<a:r><a:rPr{}>{}</a:rPr><a:t>{}</a:t></a:r>",
        props,
        font,
        escape(&run.text)
    )
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::PptxWriter;
    use crate::builder::DeckBuilder;
    use crate::config::DeckConfig;
    use deck_parser::parse;

    fn write_deck(input: &str) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        let deck = DeckBuilder::new(DeckConfig::default())
            .build(&parse(input))
            .unwrap();
        let mut buf = Cursor::new(Vec::new());
        PptxWriter::new().write(&deck, &mut buf).unwrap();
        zip::ZipArchive::new(Cursor::new(buf.into_inner())).unwrap()
    }

    fn part(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn package_has_the_expected_parts() {
        let mut archive = write_deck("# Title\n\nhello\n");
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide1.xml.rels",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {}", name);
        }

        let types = part(&mut archive, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide2.xml"));
        assert!(!types.contains("/ppt/slides/slide3.xml"));
    }

    #[test]
    fn runs_carry_their_properties() {
        let mut archive =
            write_deck("# Title\n\n## Sec\n\n**bold** and ~~gone~~\n\n```\nlet x;\n```\n");

        let title = part(&mut archive, "ppt/slides/slide1.xml");
        assert!(title.contains(r#"sz="4000""#));
        assert!(title.contains(r#"anchor="ctr""#));
        assert!(title.contains(r#"algn="ctr""#));
        assert!(title.contains(r#"lang="he""#));

        let body = part(&mut archive, "ppt/slides/slide3.xml");
        assert!(body.contains(r#"b="1""#));
        assert!(body.contains(r#"strike="sngStrike""#));
        assert!(body.contains(r#"<a:latin typeface="Courier New"/>"#));
        assert!(body.contains(r#"algn="r""#));
        assert!(body.contains(r#"anchor="t""#));
        assert!(body.contains(r#"rtl="1""#));
    }

    #[test]
    fn bullets_map_to_char_and_autonum() {
        let mut archive = write_deck("- one\n- two\n");
        let slide = part(&mut archive, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:buChar"));

        let mut archive = write_deck("5. five\n6. six\n");
        let slide = part(&mut archive, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"<a:buAutoNum type="arabicPeriod" startAt="5"/>"#));
    }

    #[test]
    fn tables_become_graphic_frames() {
        let mut archive = write_deck("| a | b |\n| - | - |\n| 1 | 2 |\n");
        let slide = part(&mut archive, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:tbl>"));
        assert_eq!(2, slide.matches("<a:gridCol").count());
        assert_eq!(2, slide.matches("<a:tr ").count());
    }

    #[test]
    fn xml_text_is_escaped() {
        let mut archive = write_deck("a < b & c\n");
        let slide = part(&mut archive, "ppt/slides/slide1.xml");
        assert!(slide.contains("&lt;"));
        assert!(slide.contains("&amp;"));
        assert!(!slide.contains("a < b"));
    }

    #[test]
    fn sections_are_listed() {
        let mut archive = write_deck("## Alpha\n\ntext\n");
        let pres = part(&mut archive, "ppt/presentation.xml");
        assert!(pres.contains(r#"<p14:section name="Alpha""#));
        assert!(pres.contains("sectionLst"));
    }

    #[test]
    fn deck_title_lands_in_core_properties() {
        let mut archive = write_deck("# My Deck\n\nbody\n");
        let core = part(&mut archive, "docProps/core.xml");
        assert!(core.contains("<dc:title>My Deck</dc:title>"));
    }
}
