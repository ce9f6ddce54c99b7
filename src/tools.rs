//! Tool selection and the pointer-gesture state machine.

use crate::mapper::ImagePoint;
use crate::shapes::Annotation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Rectangle,
    Line,
    Circle,
    Text,
    Measure,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Rectangle,
        Tool::Line,
        Tool::Circle,
        Tool::Text,
        Tool::Measure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Rectangle => "Rectangle",
            Tool::Line => "Line",
            Tool::Circle => "Circle",
            Tool::Text => "Text",
            Tool::Measure => "Measure",
        }
    }

    fn drags(self) -> bool {
        matches!(self, Tool::Rectangle | Tool::Line | Tool::Circle)
    }

    /// The shape a drag from `anchor` to `current` describes.
    fn shape(self, anchor: ImagePoint, current: ImagePoint) -> Option<Annotation> {
        match self {
            Tool::Rectangle => Some(Annotation::Rectangle {
                corner_a: anchor,
                corner_b: current,
            }),
            Tool::Line => Some(Annotation::Line {
                start: anchor,
                end: current,
            }),
            Tool::Circle => Some(Annotation::circle_through(anchor, current)),
            Tool::Text | Tool::Measure => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        tool: Tool,
        anchor: ImagePoint,
    },
    AwaitingSecondPoint {
        first: ImagePoint,
    },
}

/// What the shell should do in response to a pointer event.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolAction {
    Nothing,
    /// Transient shape to paint over the preview; never committed.
    Preview(Annotation),
    Commit(Annotation),
    /// Ask the user for a label to stamp at this point.
    PromptText(ImagePoint),
}

/// Active tool plus the gesture in flight. All points are in image space.
#[derive(Clone, Debug, Default)]
pub struct ToolDispatcher {
    tool: Option<Tool>,
    gesture: Gesture,
}

impl ToolDispatcher {
    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Change the active tool. Any gesture in flight is dropped.
    pub fn select(&mut self, tool: Option<Tool>) {
        self.tool = tool;
        self.gesture = Gesture::Idle;
    }

    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    pub fn press(&mut self, point: ImagePoint) -> ToolAction {
        let Some(tool) = self.tool else {
            return ToolAction::Nothing;
        };
        match (tool, self.gesture) {
            (Tool::Measure, Gesture::AwaitingSecondPoint { first }) => {
                self.gesture = Gesture::Idle;
                ToolAction::Commit(Annotation::Measurement {
                    start: first,
                    end: point,
                })
            }
            (Tool::Measure, _) => {
                self.gesture = Gesture::AwaitingSecondPoint { first: point };
                ToolAction::Nothing
            }
            (Tool::Text, _) => {
                self.gesture = Gesture::Idle;
                ToolAction::PromptText(point)
            }
            (tool, _) if tool.drags() => {
                self.gesture = Gesture::Dragging {
                    tool,
                    anchor: point,
                };
                ToolAction::Nothing
            }
            _ => ToolAction::Nothing,
        }
    }

    pub fn drag(&mut self, point: ImagePoint) -> ToolAction {
        match self.gesture {
            Gesture::Dragging { tool, anchor } => tool
                .shape(anchor, point)
                .map_or(ToolAction::Nothing, ToolAction::Preview),
            _ => ToolAction::Nothing,
        }
    }

    pub fn release(&mut self, point: ImagePoint) -> ToolAction {
        match self.gesture {
            Gesture::Dragging { tool, anchor } => {
                self.gesture = Gesture::Idle;
                tool.shape(anchor, point)
                    .map_or(ToolAction::Nothing, ToolAction::Commit)
            }
            _ => ToolAction::Nothing,
        }
    }
}
