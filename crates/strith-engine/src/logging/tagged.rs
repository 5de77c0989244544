use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Component tag attached to every diagnostic line.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LogTag {
    Render,
    GameView,
    Mesh,
    Camera,
    Scene,
}

impl LogTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogTag::Render => "RENDER",
            LogTag::GameView => "GAME_VIEW",
            LogTag::Mesh => "MESH",
            LogTag::Camera => "CAMERA",
            LogTag::Scene => "SCENE",
        }
    }

    /// Tags whose informational lines are printed unless configured otherwise.
    pub const DEFAULT_ENABLED: [LogTag; 2] = [LogTag::Render, LogTag::GameView];
}

impl fmt::Display for LogTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LogLevel {
    Info,
    Error,
}

/// One emitted diagnostic.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LogLine {
    pub level: LogLevel,
    pub tag: LogTag,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            LogLevel::Info => write!(f, "{}: {}", self.tag, self.message),
            LogLevel::Error => write!(f, "ERROR IN {}: {}", self.tag, self.message),
        }
    }
}

/// Destination for diagnostics that passed the tag filter.
pub trait LogSink {
    fn write(&self, line: LogLine);
}

/// Forwards diagnostics to the `log` facade, using the tag as the target.
#[derive(Debug, Default, Copy, Clone)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn write(&self, line: LogLine) {
        let target = line.tag.as_str();
        match line.level {
            LogLevel::Info => log::info!(target: target, "{line}"),
            LogLevel::Error => log::error!(target: target, "{line}"),
        }
    }
}

/// Keeps diagnostics in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    lines: Rc<RefCell<Vec<LogLine>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far, in order.
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.borrow().clone()
    }

    /// Lines rendered the way a console sink would print them.
    pub fn rendered(&self) -> Vec<String> {
        self.lines.borrow().iter().map(ToString::to_string).collect()
    }

    pub fn errors(&self) -> Vec<LogLine> {
        self.lines
            .borrow()
            .iter()
            .filter(|l| l.level == LogLevel::Error)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl LogSink for CaptureSink {
    fn write(&self, line: LogLine) {
        self.lines.borrow_mut().push(line);
    }
}

/// Tagged diagnostics handle.
///
/// Informational lines are emitted only for enabled tags; errors are always emitted.
/// Cloning is cheap and clones share the sink but own their tag set.
#[derive(Clone)]
pub struct Log {
    sink: Rc<dyn LogSink>,
    enabled: HashSet<LogTag>,
}

impl Log {
    /// Handle writing to `sink` with [`LogTag::DEFAULT_ENABLED`].
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self::with_tags(sink, LogTag::DEFAULT_ENABLED)
    }

    pub fn with_tags(sink: impl LogSink + 'static, tags: impl IntoIterator<Item = LogTag>) -> Self {
        Self {
            sink: Rc::new(sink),
            enabled: tags.into_iter().collect(),
        }
    }

    /// Handle backed by a fresh [`CaptureSink`] with every tag enabled.
    pub fn capture() -> (Self, CaptureSink) {
        let sink = CaptureSink::new();
        let log = Self::with_tags(
            sink.clone(),
            [LogTag::Render, LogTag::GameView, LogTag::Mesh, LogTag::Camera, LogTag::Scene],
        );
        (log, sink)
    }

    pub fn enable(&mut self, tag: LogTag) {
        self.enabled.insert(tag);
    }

    pub fn disable(&mut self, tag: LogTag) {
        self.enabled.remove(&tag);
    }

    pub fn is_enabled(&self, tag: LogTag) -> bool {
        self.enabled.contains(&tag)
    }

    pub fn info(&self, tag: LogTag, msg: impl fmt::Display) {
        if self.is_enabled(tag) {
            self.sink.write(LogLine {
                level: LogLevel::Info,
                tag,
                message: msg.to_string(),
            });
        }
    }

    pub fn error(&self, tag: LogTag, msg: impl fmt::Display) {
        self.sink.write(LogLine {
            level: LogLevel::Error,
            tag,
            message: msg.to_string(),
        });
    }

    pub fn render(&self, msg: impl fmt::Display) {
        self.info(LogTag::Render, msg);
    }

    pub fn render_error(&self, msg: impl fmt::Display) {
        self.error(LogTag::Render, msg);
    }

    pub fn game_view(&self, msg: impl fmt::Display) {
        self.info(LogTag::GameView, msg);
    }

    pub fn game_view_error(&self, msg: impl fmt::Display) {
        self.error(LogTag::GameView, msg);
    }

    pub fn mesh_error(&self, msg: impl fmt::Display) {
        self.error(LogTag::Mesh, msg);
    }

    pub fn camera(&self, msg: impl fmt::Display) {
        self.info(LogTag::Camera, msg);
    }

    pub fn camera_error(&self, msg: impl fmt::Display) {
        self.error(LogTag::Camera, msg);
    }

    pub fn scene(&self, msg: impl fmt::Display) {
        self.info(LogTag::Scene, msg);
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new(FacadeSink)
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log").field("enabled", &self.enabled).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tags_filter_info_lines() {
        let sink = CaptureSink::new();
        let log = Log::new(sink.clone());

        log.render("frame");
        log.camera("created device");
        log.game_view("resized");

        assert_eq!(sink.rendered(), vec!["RENDER: frame", "GAME_VIEW: resized"]);
    }

    #[test]
    fn errors_bypass_the_tag_filter() {
        let sink = CaptureSink::new();
        let log = Log::with_tags(sink.clone(), []);

        log.camera("hidden");
        log.camera_error("library was undefined");

        assert_eq!(sink.rendered(), vec!["ERROR IN CAMERA: library was undefined"]);
    }

    #[test]
    fn enable_and_disable_are_per_handle() {
        let sink = CaptureSink::new();
        let mut a = Log::new(sink.clone());
        let b = a.clone();

        a.enable(LogTag::Mesh);
        a.disable(LogTag::Render);

        a.info(LogTag::Mesh, "a mesh");
        a.render("a render");
        b.info(LogTag::Mesh, "b mesh");
        b.render("b render");

        assert_eq!(sink.rendered(), vec!["MESH: a mesh", "RENDER: b render"]);
    }

    #[test]
    fn capture_enables_everything() {
        let (log, sink) = Log::capture();
        log.scene("attached");
        log.mesh_error("no buffer");

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].tag, LogTag::Scene);
        assert_eq!(sink.errors().len(), 1);

        sink.clear();
        assert!(sink.lines().is_empty());
    }
}
