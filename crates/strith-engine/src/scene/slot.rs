use crate::gpu::GpuDevice;
use crate::logging::Log;
use crate::render::Renderable;
use crate::time::FrameTime;

use super::{Scene, SceneOwner};

/// Zero-or-one scene storage.
///
/// Renders as the attached scene, or as nothing when empty.
pub struct SceneSlot<D: GpuDevice> {
    scene: Option<Box<dyn Scene<D>>>,
    log: Log,
}

impl<D: GpuDevice> SceneSlot<D> {
    pub fn new(log: Log) -> Self {
        Self { scene: None, log }
    }

    pub fn get(&self) -> Option<&dyn Scene<D>> {
        self.scene.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn Scene<D> + 'static)> {
        self.scene.as_deref_mut()
    }

    /// Detaches and returns the current scene.
    pub fn take(&mut self) -> Option<Box<dyn Scene<D>>> {
        let scene = self.scene.take();
        if scene.is_some() {
            self.log.scene("Scene detached");
        }
        scene
    }

    /// Steps the attached scene; no-op when empty.
    pub fn update(&mut self, time: &FrameTime) {
        if let Some(scene) = self.scene.as_mut() {
            scene.update(time);
        }
    }
}

impl<D: GpuDevice> SceneOwner<D> for SceneSlot<D> {
    fn set_scene(&mut self, scene: Option<Box<dyn Scene<D>>>) {
        match scene {
            Some(scene) => {
                let replaced = self.scene.replace(scene).is_some();
                self.log.scene(if replaced { "Scene replaced" } else { "Scene attached" });
            }
            None => {
                self.take();
            }
        }
    }

    fn has_scene(&self) -> bool {
        self.scene.is_some()
    }
}

impl<D: GpuDevice> Renderable<D> for SceneSlot<D> {
    fn pre_render(&self, encoder: &mut D::Encoder) {
        if let Some(scene) = &self.scene {
            scene.pre_render(encoder);
        }
    }

    fn render(&self, encoder: &mut D::Encoder) {
        if let Some(scene) = &self.scene {
            scene.render(encoder);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::{RecordingDevice, RecordingEncoder};

    /// Counts updates into a shared cell so the test can observe it after handing the
    /// scene to the slot.
    struct Counting {
        updates: Rc<Cell<u32>>,
    }

    impl Renderable<RecordingDevice> for Counting {
        fn pre_render(&self, _: &mut RecordingEncoder) {}
        fn render(&self, _: &mut RecordingEncoder) {}
    }

    impl Scene<RecordingDevice> for Counting {
        fn update(&mut self, _: &FrameTime) {
            self.updates.set(self.updates.get() + 1);
        }
    }

    fn counting() -> (Box<dyn Scene<RecordingDevice>>, Rc<Cell<u32>>) {
        let updates = Rc::new(Cell::new(0));
        (Box::new(Counting { updates: updates.clone() }), updates)
    }

    #[test]
    fn set_then_clear_leaves_no_scene() {
        let (log, sink) = Log::capture();
        let mut slot = SceneSlot::<RecordingDevice>::new(log);
        let (scene, updates) = counting();

        slot.set_scene(Some(scene));
        assert!(slot.has_scene());
        slot.update(&FrameTime::fixed(0.016, 0));
        assert_eq!(updates.get(), 1);

        slot.set_scene(None);
        assert!(!slot.has_scene());
        assert!(slot.get().is_none());
        slot.update(&FrameTime::fixed(0.016, 1));
        assert_eq!(updates.get(), 1);

        assert_eq!(sink.rendered(), vec!["SCENE: Scene attached", "SCENE: Scene detached"]);
    }

    #[test]
    fn setting_replaces_never_merges() {
        let (log, _) = Log::capture();
        let mut slot = SceneSlot::<RecordingDevice>::new(log);
        let (first, first_updates) = counting();
        let (second, second_updates) = counting();

        slot.set_scene(Some(first));
        slot.set_scene(Some(second));
        slot.update(&FrameTime::fixed(0.016, 0));

        assert_eq!(first_updates.get(), 0);
        assert_eq!(second_updates.get(), 1);
    }

    #[test]
    fn clearing_an_empty_slot_is_silent() {
        let (log, sink) = Log::capture();
        let mut slot = SceneSlot::<RecordingDevice>::new(log);

        slot.set_scene(None);

        assert!(slot.take().is_none());
        assert!(sink.lines().is_empty());
    }
}
