use std::num::NonZeroU64;

use crate::render::Uniforms;

/// Slot bookkeeping for the per-frame uniform arena.
///
/// Slots are handed out in order and rewound at frame start. When a frame runs out of
/// slots the arena moves to fresh storage twice the size and the cursor starts over there.
#[derive(Debug, Clone)]
pub(crate) struct SlotCursor {
    stride: u64,
    capacity: u32,
    next: u32,
}

impl SlotCursor {
    pub fn new(stride: u64, capacity: u32) -> Self {
        Self {
            stride,
            capacity: capacity.max(1),
            next: 0,
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Byte offset of the next free slot, or `None` when the arena is full.
    pub fn claim(&mut self) -> Option<u64> {
        if self.next >= self.capacity {
            return None;
        }
        let slot = self.next;
        self.next += 1;
        Some(u64::from(slot) * self.stride)
    }

    pub fn rewind(&mut self) {
        self.next = 0;
    }

    /// Doubles the capacity and restarts at slot zero. Returns the new capacity, or `None`
    /// when it cannot grow any further.
    pub fn grow(&mut self) -> Option<u32> {
        let capacity = self.capacity.checked_mul(2)?;
        self.capacity = capacity;
        self.next = 0;
        Some(capacity)
    }
}

/// Rounds the uniform block size up to the device's dynamic offset alignment.
pub(crate) fn uniform_stride(min_offset_alignment: u32) -> u64 {
    let align = u64::from(min_offset_alignment.max(1));
    (Uniforms::SIZE as u64).div_ceil(align) * align
}

/// Transient uniform storage for one frame.
///
/// Every `push` copies a uniform block into its own slot and returns the dynamic offset to
/// bind it with. Writes are staged through the queue, so they land before the frame's
/// command buffer executes. A full arena is replaced mid-frame; passes that already bound
/// the old buffer keep it alive until they finish.
pub(crate) struct UniformArena {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    cursor: SlotCursor,
}

impl UniformArena {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: u32,
    ) -> Self {
        let cursor = SlotCursor::new(stride, capacity);
        let (buffer, bind_group) = allocate(device, layout, &cursor);
        Self {
            buffer,
            bind_group,
            cursor,
        }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn capacity(&self) -> u32 {
        self.cursor.capacity()
    }

    pub fn begin_frame(&mut self) {
        self.cursor.rewind();
    }

    /// Stages `bytes` into the next slot and returns its dynamic offset. Grows the arena
    /// when it is full; `None` only when no larger arena can be addressed.
    pub fn push(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        queue: &wgpu::Queue,
        bytes: &[u8],
    ) -> Option<u32> {
        debug_assert!(bytes.len() <= Uniforms::SIZE);
        let offset = match self.cursor.claim() {
            Some(offset) => offset,
            None => {
                self.grow(device, layout)?;
                self.cursor.claim()?
            }
        };
        let offset = u32::try_from(offset).ok()?;
        queue.write_buffer(&self.buffer, u64::from(offset), bytes);
        Some(offset)
    }

    fn grow(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Option<()> {
        let mut cursor = self.cursor.clone();
        let capacity = cursor.grow()?;
        let size = cursor.stride().checked_mul(u64::from(capacity))?;
        if size > device.limits().max_buffer_size {
            log::warn!("uniform arena cannot grow past {} slots", self.cursor.capacity());
            return None;
        }
        log::debug!("uniform arena grown to {capacity} slots");
        let (buffer, bind_group) = allocate(device, layout, &cursor);
        self.buffer = buffer;
        self.bind_group = bind_group;
        self.cursor = cursor;
        Some(())
    }
}

fn allocate(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    cursor: &SlotCursor,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("strith uniform arena"),
        size: cursor.stride() * u64::from(cursor.capacity()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("strith uniform arena bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(Uniforms::SIZE as u64),
            }),
        }],
    });

    (buffer, bind_group)
}
