//! Basic usage of the highlighting API

use limelight_api::{
    parse_annotations, render_text, Annotation, Config, Highlighter, Input, MentionType,
    SourceKind,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Method 1: exact offsets against canonical text
    println!("=== Method 1: Canonical Text ===");
    let text = "Kael raised his staff. Mira watched him.";
    let annotations = vec![
        Annotation::new("Kael", "character", 0, 4),
        Annotation::new("Mira", "character", 23, 27),
        Annotation::new("Kael", "character", 36, 39)
            .with_extraction_text("him")
            .with_mention_type(MentionType::Pronoun),
    ];
    let output = render_text(text, &annotations)?;
    println!("{}", output.html);
    println!(
        "{} highlight(s) in {:.3}ms\n",
        output.metadata.highlights, output.metadata.processing_time_ms
    );

    // Method 2: chapter markup, located by text
    println!("=== Method 2: Chapter Markup ===");
    let config = Config::builder()
        .source_kind(SourceKind::Markup)
        .mention_types(["direct_name"])?
        .build()?;
    let highlighter = Highlighter::with_config(config)?;
    let markup = "<p>&ldquo;Again,&rdquo; said <b>Mira</b>.</p><p>[Skill Acquired: Fireball]</p>";
    let output = highlighter.render(Input::from_text(markup), &annotations)?;
    println!("{}", output.html);
    println!(
        "{} hidden by filter, {} not found\n",
        output.metadata.annotations_filtered, output.metadata.annotations_dropped
    );

    // Method 3: annotations from JSON
    println!("=== Method 3: JSON Annotations ===");
    let annotations = parse_annotations(
        r#"{"annotations": [
            {"entity_name": "Fireball", "entity_type": "skill",
             "char_offset_start": 11, "char_offset_end": 19, "confidence": 0.9}
        ]}"#,
    )?;
    let output = render_text("Kael casts Fireball.", &annotations)?;
    println!("{}", output.to_json()?);

    Ok(())
}
