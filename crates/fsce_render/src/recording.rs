use glam::{IVec2, UVec2};
use image::Rgba;

use crate::handle::ImageHandle;
use crate::surface::Surface;

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    Stroke,
    DrawImage {
        image: ImageHandle,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    FillText { text: String, x: f32, y: f32 },
    SetFillStyle(Rgba<u8>),
    SetStrokeStyle(Rgba<u8>),
    SetFont(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blit {
    pub image: ImageHandle,
    pub position: IVec2,
    pub size: UVec2,
}

/// Surface that draws nothing and remembers every call in order.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: UVec2,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Every image blit in draw order.
    pub fn blits(&self) -> Vec<Blit> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::DrawImage {
                    image,
                    x,
                    y,
                    width,
                    height,
                } => Some(Blit {
                    image: image.clone(),
                    position: IVec2::new(*x, *y),
                    size: UVec2::new(*width, *height),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn draw_image(&mut self, image: &ImageHandle, x: i32, y: i32, width: u32, height: u32) {
        self.commands.push(DrawCommand::DrawImage {
            image: image.clone(),
            x,
            y,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn set_fill_style(&mut self, color: Rgba<u8>) {
        self.commands.push(DrawCommand::SetFillStyle(color));
    }

    fn set_stroke_style(&mut self, color: Rgba<u8>) {
        self.commands.push(DrawCommand::SetStrokeStyle(color));
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::SetFont(font.to_string()));
    }
}
