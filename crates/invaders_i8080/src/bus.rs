/// Memory and IO port interface for an Intel 8080-compatible CPU core.
///
/// The CPU uses this trait to access memory and IO ports without knowing
/// anything about the concrete machine. Every access is issued at the moment
/// the instruction needs it; the core never caches memory contents, so
/// memory-mapped devices observe the same access order as on hardware.
pub trait Bus {
    fn read_memory(&mut self, addr: u16) -> u8;
    fn write_memory(&mut self, addr: u16, value: u8);

    fn read_port(&mut self, port: u8) -> u8;
    fn write_port(&mut self, port: u8, value: u8);

    /// Read-modify-write of a single memory byte as one logical access.
    ///
    /// Returns the value stored. The default implementation is a plain read
    /// followed by a write; buses whose devices count accesses can override
    /// this and mutate the backing byte in place.
    fn update_memory(&mut self, addr: u16, f: &mut dyn FnMut(u8) -> u8) -> u8 {
        let value = f(self.read_memory(addr));
        self.write_memory(addr, value);
        value
    }

    /// Obtain a handle to the memory byte at `addr`.
    fn memory_cell(&mut self, addr: u16) -> MemoryCell<'_, Self>
    where
        Self: Sized,
    {
        MemoryCell { bus: self, addr }
    }
}

/// Handle to one addressable memory byte.
///
/// This is how the core reaches the `M` operand (the byte addressed by HL).
/// Each method is exactly one logical bus access.
pub struct MemoryCell<'a, B: Bus> {
    bus: &'a mut B,
    addr: u16,
}

impl<B: Bus> MemoryCell<'_, B> {
    pub fn addr(&self) -> u16 {
        self.addr
    }

    pub fn get(&mut self) -> u8 {
        self.bus.read_memory(self.addr)
    }

    pub fn set(&mut self, value: u8) {
        self.bus.write_memory(self.addr, value);
    }

    pub fn update(&mut self, mut f: impl FnMut(u8) -> u8) -> u8 {
        self.bus.update_memory(self.addr, &mut f)
    }
}

/// Bus with nothing attached.
///
/// Useful for register-only scenarios. Reads float to `0x00` (which also
/// decodes as NOP) and writes are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBus;

impl Bus for NullBus {
    fn read_memory(&mut self, _addr: u16) -> u8 {
        0
    }

    fn write_memory(&mut self, _addr: u16, _value: u8) {}

    fn read_port(&mut self, _port: u8) -> u8 {
        0
    }

    fn write_port(&mut self, _port: u8, _value: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingBus {
        mem: Vec<u8>,
        reads: usize,
        writes: usize,
    }

    impl Bus for CountingBus {
        fn read_memory(&mut self, addr: u16) -> u8 {
            self.reads += 1;
            self.mem[addr as usize]
        }

        fn write_memory(&mut self, addr: u16, value: u8) {
            self.writes += 1;
            self.mem[addr as usize] = value;
        }

        fn read_port(&mut self, _port: u8) -> u8 {
            0
        }

        fn write_port(&mut self, _port: u8, _value: u8) {}
    }

    #[test]
    fn default_update_is_read_then_write() {
        let mut bus = CountingBus {
            mem: vec![0; 0x10],
            ..Default::default()
        };
        bus.mem[3] = 0x41;

        let stored = bus.memory_cell(3).update(|v| v + 1);

        assert_eq!(stored, 0x42);
        assert_eq!(bus.mem[3], 0x42);
        assert_eq!((bus.reads, bus.writes), (1, 1));
    }

    #[test]
    fn cell_get_and_set_touch_only_their_address() {
        let mut bus = CountingBus {
            mem: vec![0; 0x10],
            ..Default::default()
        };
        let mut cell = bus.memory_cell(7);
        assert_eq!(cell.addr(), 7);
        cell.set(0x99);
        assert_eq!(cell.get(), 0x99);
        assert_eq!(bus.mem.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn null_bus_is_inert() {
        let mut bus = NullBus;
        bus.write_memory(0x1234, 0xff);
        bus.write_port(0x10, 0xff);
        assert_eq!(bus.read_memory(0x1234), 0);
        assert_eq!(bus.read_port(0x10), 0);
        assert_eq!(bus.memory_cell(0x1234).update(|v| v.wrapping_add(1)), 1);
    }
}
