use anyhow::{ensure, Result};
use invaders_i8080::Bus;

/// Total addressable memory size (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Flat 64 KiB RAM with latched IO ports.
///
/// Input ports hold whatever the host last latched with [`RamBus::set_input`].
/// Output ports remember the last value the program wrote, and the most
/// recent write is kept until [`RamBus::take_port_write`] collects it so a
/// driver can react to `OUT` instructions between steps.
pub struct RamBus {
    memory: Box<[u8]>,
    inputs: [u8; 256],
    outputs: [u8; 256],
    last_write: Option<(u8, u8)>,
}

impl RamBus {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE].into_boxed_slice(),
            inputs: [0; 256],
            outputs: [0; 256],
            last_write: None,
        }
    }

    /// Copy an image into memory starting at `addr`.
    ///
    /// Images never wrap around the top of the address space.
    pub fn load(&mut self, addr: u16, image: &[u8]) -> Result<()> {
        let start = addr as usize;
        let end = start + image.len();
        ensure!(
            end <= MEMORY_SIZE,
            "image of {} bytes at {:04X} does not fit in 64 KiB",
            image.len(),
            addr
        );
        self.memory[start..end].copy_from_slice(image);
        Ok(())
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Read memory without going through the CPU.
    pub fn peek(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    pub fn set_input(&mut self, port: u8, value: u8) {
        self.inputs[port as usize] = value;
    }

    pub fn output(&self, port: u8) -> u8 {
        self.outputs[port as usize]
    }

    /// The most recent `(port, value)` written since the last call.
    pub fn take_port_write(&mut self) -> Option<(u8, u8)> {
        self.last_write.take()
    }
}

impl Default for RamBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for RamBus {
    fn read_memory(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write_memory(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    fn read_port(&mut self, port: u8) -> u8 {
        self.inputs[port as usize]
    }

    fn write_port(&mut self, port: u8, value: u8) {
        self.outputs[port as usize] = value;
        self.last_write = Some((port, value));
    }

    fn update_memory(&mut self, addr: u16, f: &mut dyn FnMut(u8) -> u8) -> u8 {
        let cell = &mut self.memory[addr as usize];
        *cell = f(*cell);
        *cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_copies_image() {
        let mut bus = RamBus::new();
        bus.load(0x0100, &[1, 2, 3]).unwrap();
        assert_eq!(&bus.memory()[0x0100..0x0103], &[1, 2, 3]);
    }

    #[test]
    fn load_accepts_image_ending_at_top_of_memory() {
        let mut bus = RamBus::new();
        bus.load(0xfffe, &[0xaa, 0xbb]).unwrap();
        assert_eq!(bus.peek(0xffff), 0xbb);
    }

    #[test]
    fn load_rejects_image_past_top_of_memory() {
        let mut bus = RamBus::new();
        assert!(bus.load(0xffff, &[0xaa, 0xbb]).is_err());
        assert_eq!(bus.peek(0xffff), 0x00);
    }

    #[test]
    fn ports_are_latched() {
        let mut bus = RamBus::new();
        bus.set_input(3, 0x5a);
        assert_eq!(bus.read_port(3), 0x5a);
        assert_eq!(bus.read_port(4), 0x00);

        bus.write_port(6, 0x11);
        bus.write_port(5, 0x22);
        assert_eq!(bus.output(6), 0x11);
        assert_eq!(bus.take_port_write(), Some((5, 0x22)));
        assert_eq!(bus.take_port_write(), None);
    }

    #[test]
    fn update_memory_mutates_in_place() {
        let mut bus = RamBus::new();
        bus.write_memory(0x2000, 0x41);
        let v = bus.update_memory(0x2000, &mut |v| v + 1);
        assert_eq!(v, 0x42);
        assert_eq!(bus.peek(0x2000), 0x42);
    }
}
