//! Default objects created from the toolbar.
//!
//! Everything is dropped relative to the surface center.

use super::ShapeChoice;
use crate::shapes::{
    Ellipse, Image, ImageError, Note, Rectangle, SerializableColor, Shape, ShapeStyle, Text,
};
use kurbo::{Point, Vec2};

const TEXT_COLOR: SerializableColor = SerializableColor {
    r: 0x33,
    g: 0x33,
    b: 0x33,
    a: 255,
};
const RECTANGLE_FILL: SerializableColor = SerializableColor {
    r: 0x00,
    g: 0xaa,
    b: 0xff,
    a: 255,
};
const SQUARE_FILL: SerializableColor = SerializableColor {
    r: 0x00,
    g: 0xcc,
    b: 0x66,
    a: 255,
};
const CIRCLE_FILL: SerializableColor = SerializableColor {
    r: 0xff,
    g: 0xcc,
    b: 0x00,
    a: 255,
};
const NOTE_FILL: SerializableColor = SerializableColor {
    r: 0xff,
    g: 0xf8,
    b: 0xa7,
    a: 255,
};
const NOTE_BORDER: SerializableColor = SerializableColor {
    r: 0xcc,
    g: 0xcc,
    b: 0xcc,
    a: 255,
};

/// Editable "Edit me" text with its top-left corner at `center`.
pub fn text(center: Point) -> Shape {
    Shape::Text(
        Text::new(center, "Edit me")
            .with_font_size(24.0)
            .with_fill(TEXT_COLOR),
    )
}

/// Shape picked in the shape picker, centered on `center`.
pub fn shape(choice: ShapeChoice, center: Point) -> Shape {
    let outline = |fill| ShapeStyle::filled(fill, SerializableColor::black(), 2.0);
    match choice {
        ShapeChoice::Rectangle => Shape::Rectangle(
            Rectangle::new(center - Vec2::new(50.0, 25.0), 100.0, 50.0)
                .with_style(outline(RECTANGLE_FILL)),
        ),
        ShapeChoice::Square => Shape::Rectangle(
            Rectangle::new(center - Vec2::new(50.0, 50.0), 100.0, 100.0)
                .with_style(outline(SQUARE_FILL)),
        ),
        ShapeChoice::Circle => {
            Shape::Ellipse(Ellipse::circle(center, 50.0).with_style(outline(CIRCLE_FILL)))
        }
    }
}

/// Sticky note with its top-left corner at `center`.
pub fn note(center: Point) -> Shape {
    let body = Rectangle::new(center, 140.0, 100.0)
        .with_style(ShapeStyle::filled(NOTE_FILL, NOTE_BORDER, 1.0))
        .with_corner_radius(5.0);
    let label = Text::new(center + Vec2::new(10.0, 10.0), "Note...")
        .with_font_size(14.0)
        .with_box_width(120.0)
        .with_fill(TEXT_COLOR);
    Shape::Note(Note::new(body, label))
}

/// Image at `center`, shrunk so it fits the surface minus `margin` on each axis.
pub fn image(
    center: Point,
    data: &[u8],
    width: u32,
    height: u32,
    surface: (f64, f64),
    margin: f64,
) -> Result<Shape, ImageError> {
    let image = Image::from_bytes(center, data, width, height)?;
    Ok(Shape::Image(
        image.shrink_to_fit(surface.0 - margin, surface.1 - margin),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeTrait;
    use kurbo::Rect;

    const C: Point = Point::new(1500.0, 1500.0);

    #[test]
    fn test_shapes_centered() {
        for choice in [ShapeChoice::Rectangle, ShapeChoice::Square, ShapeChoice::Circle] {
            let shape = shape(choice, C);
            assert_eq!(shape.center(), C, "{choice:?}");
        }
        let Shape::Rectangle(rect) = shape(ShapeChoice::Rectangle, C) else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.as_rect(), Rect::new(1450.0, 1475.0, 1550.0, 1525.0));
        assert_eq!(rect.style.fill_color.map(|c| c.to_hex()), Some("#00aaff".into()));
    }

    #[test]
    fn test_note_layout() {
        let Shape::Note(note) = note(C) else {
            panic!("expected note");
        };
        assert_eq!(note.body.position, C);
        assert!((note.body.corner_radius - 5.0).abs() < f64::EPSILON);
        assert_eq!(note.label.position, Point::new(1510.0, 1510.0));
        assert_eq!(note.label.box_width, Some(120.0));
        assert_eq!(note.text(), "Note...");
        assert_eq!(note.style().stroke_color.to_hex(), "#cccccc");
    }

    #[test]
    fn test_text_defaults() {
        let Shape::Text(text) = text(C) else {
            panic!("expected text");
        };
        assert_eq!(text.content, "Edit me");
        assert!((text.font_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(text.style.fill_color, Some(TEXT_COLOR));
    }

    #[test]
    fn test_large_image_is_scaled_down() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let Shape::Image(image) = image(C, &png, 5600, 1400, (3000.0, 3000.0), 200.0).unwrap()
        else {
            panic!("expected image");
        };
        assert!((image.width - 2800.0).abs() < 1e-9);
        assert!((image.height - 700.0).abs() < 1e-9);
        assert_eq!(image.position, C);
    }

    #[test]
    fn test_small_image_keeps_size() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let Shape::Image(image) = image(C, &png, 64, 32, (3000.0, 3000.0), 200.0).unwrap() else {
            panic!("expected image");
        };
        assert!((image.width - 64.0).abs() < f64::EPSILON);
    }
}
