use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::deck::{ContentSlide, DeckBuilder, TitleSlide};
use crate::error::Result;
use crate::geometry::{Canvas, Line, Rect, cm_to_emu, condition_display_text};
use crate::pptx_parts::*;

/// Outline width for connectors, 2 pt
const CONNECTOR_WIDTH_EMU: i64 = 2 * 12_700;

const TITLE_FONT: &str = "Arial";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

/// Character and paragraph settings for one text box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Points; `None` inherits the master's 18 pt
    pub size_pt: Option<u32>,
    pub bold: bool,
    pub font: Option<&'static str>,
    pub align: Option<Align>,
    pub anchor: Anchor,
    pub wrap: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            size_pt: None,
            bold: false,
            font: None,
            align: None,
            anchor: Anchor::Top,
            wrap: false,
        }
    }
}

impl TextStyle {
    fn heading(size_pt: u32) -> Self {
        TextStyle {
            size_pt: Some(size_pt),
            bold: true,
            font: Some(TITLE_FONT),
            align: Some(Align::Center),
            anchor: Anchor::Middle,
            wrap: true,
        }
    }

    fn condition() -> Self {
        TextStyle {
            size_pt: Some(6),
            align: Some(Align::Center),
            wrap: true,
            ..TextStyle::default()
        }
    }

    fn axis() -> Self {
        TextStyle {
            align: Some(Align::Right),
            anchor: Anchor::Middle,
            ..TextStyle::default()
        }
    }
}

fn xfrm(left: i64, top: i64, width: i64, height: i64, flip_h: bool, flip_v: bool) -> String {
    let mut flips = String::new();
    if flip_h {
        flips.push_str(r#" flipH="1""#);
    }
    if flip_v {
        flips.push_str(r#" flipV="1""#);
    }
    format!(
        r#"<a:xfrm{flips}><a:off x="{left}" y="{top}"/><a:ext cx="{width}" cy="{height}"/></a:xfrm>"#
    )
}

fn rect_xfrm(rect: &Rect) -> String {
    xfrm(
        cm_to_emu(rect.left),
        cm_to_emu(rect.top),
        cm_to_emu(rect.width).max(0),
        cm_to_emu(rect.height).max(0),
        false,
        false,
    )
}

/// Shape tree of one slide under construction
struct SlidePart {
    shapes: String,
    next_shape_id: u32,
    /// `(rId, media file name)`, rId1 is the layout
    images: Vec<(String, String)>,
}

impl SlidePart {
    fn new() -> Self {
        SlidePart {
            shapes: String::new(),
            next_shape_id: 2,
            images: Vec::new(),
        }
    }

    fn shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    fn image_rel(&mut self, media_name: &str) -> String {
        if let Some((rid, _)) = self.images.iter().find(|(_, name)| name == media_name) {
            return rid.clone();
        }
        let rid = format!("rId{}", self.images.len() + 2);
        self.images.push((rid.clone(), media_name.to_string()));
        rid
    }

    fn picture(&mut self, media_name: &str, rect: &Rect) {
        let rid = self.image_rel(media_name);
        let id = self.shape_id();
        self.shapes.push_str(&format!(
            concat!(
                r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}" descr="{descr}"/>"#,
                r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
                r#"<p:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
            ),
            id = id,
            descr = escape_xml(media_name),
            rid = rid,
            xfrm = rect_xfrm(rect),
        ));
    }

    fn text_box(&mut self, rect: &Rect, text: &str, style: &TextStyle) {
        let id = self.shape_id();

        let mut body_pr = format!(r#"<a:bodyPr wrap="{}" rtlCol="0""#, if style.wrap { "square" } else { "none" });
        if style.anchor == Anchor::Middle {
            body_pr.push_str(r#" anchor="ctr""#);
        }
        body_pr.push_str("><a:spAutoFit/></a:bodyPr>");

        let p_pr = match style.align {
            Some(Align::Left) => r#"<a:pPr algn="l"/>"#,
            Some(Align::Center) => r#"<a:pPr algn="ctr"/>"#,
            Some(Align::Right) => r#"<a:pPr algn="r"/>"#,
            None => "",
        };

        let mut r_pr = String::from(r#"<a:rPr lang="en-US""#);
        if let Some(size) = style.size_pt {
            r_pr.push_str(&format!(r#" sz="{}""#, size * 100));
        }
        if style.bold {
            r_pr.push_str(r#" b="1""#);
        }
        r_pr.push_str(r#" dirty="0""#);
        match style.font {
            Some(font) => r_pr.push_str(&format!(r#"><a:latin typeface="{font}"/></a:rPr>"#)),
            None => r_pr.push_str("/>"),
        }

        let mut paragraphs = String::new();
        for line in text.split('\n') {
            paragraphs.push_str(&format!(
                "<a:p>{p_pr}<a:r>{r_pr}<a:t>{}</a:t></a:r></a:p>",
                escape_xml(line)
            ));
        }

        self.shapes.push_str(&format!(
            concat!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#,
                r#"<p:txBody>{body_pr}<a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
            ),
            id = id,
            xfrm = rect_xfrm(rect),
            body_pr = body_pr,
            paragraphs = paragraphs,
        ));
    }

    /// Solid black 2 pt straight connector without shadow
    fn connector(&mut self, line: &Line) {
        let id = self.shape_id();
        let (x1, y1, x2, y2) = (
            cm_to_emu(line.x1),
            cm_to_emu(line.y1),
            cm_to_emu(line.x2),
            cm_to_emu(line.y2),
        );
        let frame = xfrm(
            x1.min(x2),
            y1.min(y2),
            (x2 - x1).abs(),
            (y2 - y1).abs(),
            x2 < x1,
            y2 < y1,
        );
        self.shapes.push_str(&format!(
            concat!(
                r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{id}" name="Straight Connector {id}"/>"#,
                r#"<p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>"#,
                r#"<p:spPr>{frame}<a:prstGeom prst="line"><a:avLst/></a:prstGeom>"#,
                r#"<a:ln w="{width}"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln>"#,
                r#"<a:effectLst/></p:spPr></p:cxnSp>"#
            ),
            id = id,
            frame = frame,
            width = CONNECTOR_WIDTH_EMU,
        ));
    }

    fn to_xml(&self) -> String {
        format!(
            r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree>{SP_TREE_HEADER}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            self.shapes
        )
    }

    fn rels_xml(&self) -> String {
        let mut rels = vec![(
            "rId1".to_string(),
            REL_SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml".to_string(),
        )];
        for (rid, media) in &self.images {
            rels.push((rid.clone(), REL_IMAGE, format!("../media/{media}")));
        }
        relationships(&rels)
    }
}

/// Presentation written as an OOXML package (`.pptx`)
///
/// Slides are kept in memory as XML; pictures are referenced by path and
/// copied into the package on `save`. A file placed on several slides is
/// embedded once.
pub struct PptxDeck {
    canvas: Canvas,
    slides: Vec<SlidePart>,
    /// `(media file name, source path)` in embedding order
    media: Vec<(String, PathBuf)>,
    media_by_path: HashMap<PathBuf, String>,
    title: String,
    created: DateTime<Utc>,
}

impl PptxDeck {
    pub fn new(canvas: Canvas) -> Self {
        PptxDeck {
            canvas,
            slides: Vec::new(),
            media: Vec::new(),
            media_by_path: HashMap::new(),
            title: String::new(),
            created: Utc::now(),
        }
    }

    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    fn embed_media(&mut self, path: &Path) -> String {
        if let Some(name) = self.media_by_path.get(path) {
            return name.clone();
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "bin".to_string());
        let name = format!("image{}.{}", self.media.len() + 1, ext);
        self.media.push((name.clone(), path.to_path_buf()));
        self.media_by_path.insert(path.to_path_buf(), name.clone());
        name
    }

    fn presentation_xml(&self) -> String {
        let mut slide_ids = String::new();
        for i in 0..self.slides.len() {
            slide_ids.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + i,
                FIRST_SLIDE_REL + i
            ));
        }
        format!(
            concat!(
                r#"{decl}<p:presentation xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" saveSubsetFonts="1">"#,
                r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
                r#"<p:sldIdLst>{ids}</p:sldIdLst>"#,
                r#"<p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
                r#"</p:presentation>"#
            ),
            decl = XML_DECL,
            a = NS_A,
            r = NS_R,
            p = NS_P,
            ids = slide_ids,
            cx = cm_to_emu(self.canvas.width),
            cy = cm_to_emu(self.canvas.height),
        )
    }

    fn presentation_rels_xml(&self) -> String {
        let mut rels = vec![
            ("rId1".to_string(), REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()),
            ("rId2".to_string(), REL_PRES_PROPS, "presProps.xml".to_string()),
            ("rId3".to_string(), REL_VIEW_PROPS, "viewProps.xml".to_string()),
            ("rId4".to_string(), REL_THEME, "theme/theme1.xml".to_string()),
            ("rId5".to_string(), REL_TABLE_STYLES, "tableStyles.xml".to_string()),
        ];
        for i in 0..self.slides.len() {
            rels.push((
                format!("rId{}", FIRST_SLIDE_REL + i),
                REL_SLIDE,
                format!("slides/slide{}.xml", i + 1),
            ));
        }
        relationships(&rels)
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        xml.push_str(&format!(r#"<Default Extension="rels" ContentType="{CT_RELS}"/>"#));
        xml.push_str(&format!(r#"<Default Extension="xml" ContentType="{CT_XML}"/>"#));

        let mut extensions: Vec<&str> = self
            .media
            .iter()
            .filter_map(|(name, _)| name.rsplit_once('.').map(|(_, ext)| ext))
            .collect();
        extensions.sort_unstable();
        extensions.dedup();
        for ext in extensions {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                image_content_type(ext)
            ));
        }

        let overrides = [
            ("/ppt/presentation.xml", CT_PRESENTATION),
            ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
            ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
            ("/ppt/theme/theme1.xml", CT_THEME),
            ("/ppt/presProps.xml", CT_PRES_PROPS),
            ("/ppt/viewProps.xml", CT_VIEW_PROPS),
            ("/ppt/tableStyles.xml", CT_TABLE_STYLES),
            ("/docProps/core.xml", CT_CORE_PROPS),
            ("/docProps/app.xml", CT_EXTENDED_PROPS),
        ];
        for (part, content_type) in overrides {
            xml.push_str(&format!(r#"<Override PartName="{part}" ContentType="{content_type}"/>"#));
        }
        for i in 0..self.slides.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{CT_SLIDE}"/>"#,
                i + 1
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn core_xml(&self) -> String {
        let created = self.created.format("%Y-%m-%dT%H:%M:%SZ");
        format!(
            concat!(
                r#"{decl}<cp:coreProperties "#,
                r#"xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                r#"<dc:title>{title}</dc:title><dc:creator>westernizer</dc:creator>"#,
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
                r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified>"#,
                r#"</cp:coreProperties>"#
            ),
            decl = XML_DECL,
            title = escape_xml(&self.title),
            created = created,
        )
    }

    fn app_xml(&self) -> String {
        format!(
            concat!(
                r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
                r#"<Application>westernizer</Application><Slides>{}</Slides></Properties>"#
            ),
            XML_DECL,
            self.slides.len()
        )
    }

    /// Writes the whole package into `writer`
    pub fn write_to<W: Write + std::io::Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let root_rels = relationships(&[
            ("rId1".to_string(), REL_OFFICE_DOCUMENT, "ppt/presentation.xml".to_string()),
            ("rId2".to_string(), REL_CORE_PROPS, "docProps/core.xml".to_string()),
            ("rId3".to_string(), REL_EXTENDED_PROPS, "docProps/app.xml".to_string()),
        ]);
        let master_rels = relationships(&[
            ("rId1".to_string(), REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string()),
            ("rId2".to_string(), REL_THEME, "../theme/theme1.xml".to_string()),
        ]);
        let layout_rels = relationships(&[(
            "rId1".to_string(),
            REL_SLIDE_MASTER,
            "../slideMasters/slideMaster1.xml".to_string(),
        )]);

        let mut parts: Vec<(String, Vec<u8>)> = vec![
            ("[Content_Types].xml".to_string(), self.content_types_xml().into_bytes()),
            ("_rels/.rels".to_string(), root_rels.into_bytes()),
            ("docProps/core.xml".to_string(), self.core_xml().into_bytes()),
            ("docProps/app.xml".to_string(), self.app_xml().into_bytes()),
            ("ppt/presentation.xml".to_string(), self.presentation_xml().into_bytes()),
            ("ppt/_rels/presentation.xml.rels".to_string(), self.presentation_rels_xml().into_bytes()),
            ("ppt/presProps.xml".to_string(), PRES_PROPS.as_bytes().to_vec()),
            ("ppt/viewProps.xml".to_string(), VIEW_PROPS.as_bytes().to_vec()),
            ("ppt/tableStyles.xml".to_string(), TABLE_STYLES.as_bytes().to_vec()),
            ("ppt/theme/theme1.xml".to_string(), THEME.as_bytes().to_vec()),
            ("ppt/slideMasters/slideMaster1.xml".to_string(), SLIDE_MASTER.as_bytes().to_vec()),
            ("ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(), master_rels.into_bytes()),
            ("ppt/slideLayouts/slideLayout1.xml".to_string(), SLIDE_LAYOUT.as_bytes().to_vec()),
            ("ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(), layout_rels.into_bytes()),
        ];

        for (i, slide) in self.slides.iter().enumerate() {
            parts.push((format!("ppt/slides/slide{}.xml", i + 1), slide.to_xml().into_bytes()));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                slide.rels_xml().into_bytes(),
            ));
        }

        for (name, bytes) in parts {
            zip.start_file(name, options)?;
            zip.write_all(&bytes)?;
        }

        // Pictures are already compressed
        let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, source) in &self.media {
            let bytes = fs::read(source)?;
            zip.start_file(format!("ppt/media/{name}"), stored)?;
            zip.write_all(&bytes)?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// Slide relationships in `presentation.xml.rels` start after the fixed parts
const FIRST_SLIDE_REL: usize = 6;

impl DeckBuilder for PptxDeck {
    fn add_title_slide(&mut self, slide: &TitleSlide) -> Result<()> {
        let width = self.canvas.width;
        let mut part = SlidePart::new();
        part.text_box(&Rect::new(0.0, 5.7, width, 5.0), &slide.title, &TextStyle::heading(32));
        part.text_box(&Rect::new(0.0, 12.0, width, 1.0), &slide.subtitle, &TextStyle::heading(16));
        if self.title.is_empty() {
            self.title = slide.title.clone();
        }
        self.slides.push(part);
        Ok(())
    }

    fn add_content_slide(&mut self, slide: &ContentSlide) -> Result<()> {
        let plan = &slide.plan;
        let mut part = SlidePart::new();

        let image_name = self.embed_media(&slide.image);
        part.picture(&image_name, &plan.image);

        if let (Some(marker), Some(rect)) = (&slide.marker, &plan.marker) {
            let marker_name = self.embed_media(marker);
            part.picture(&marker_name, rect);
        }

        if let Some(slots) = &plan.labels {
            for (slot, condition) in slots.iter().zip(&slide.conditions) {
                part.connector(&slot.connector);
                part.text_box(
                    &slot.text_rect,
                    condition_display_text(&condition.text),
                    &TextStyle::condition(),
                );
            }
        }

        let notes = &plan.annotations;
        part.text_box(&notes.caption, &slide.caption, &TextStyle::default());
        part.text_box(&notes.kda_label, "kDa", &TextStyle::axis());
        part.connector(&notes.kda_tick);

        self.slides.push(part);
        Ok(())
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        log::info!(
            "Saved {} slides with {} pictures to {}",
            self.slides.len(),
            self.media.len(),
            path.display()
        );
        Ok(())
    }
}
