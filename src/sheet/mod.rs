//! Sheet model: the scanned page, its scale and its systems.

pub mod scale;
pub mod system;

pub use scale::{Fraction, Scale};
pub use system::SystemInfo;

/// A scanned page: the resolution scale plus the list of systems.
///
/// Systems are assumed non-overlapping; they are processed independently
/// and possibly in parallel.
#[derive(Debug, Clone)]
pub struct Sheet {
    scale: Scale,
    systems: Vec<SystemInfo>,
}

impl Sheet {
    /// Creates an empty sheet with the given scale.
    pub fn new(scale: Scale) -> Self {
        Self {
            scale,
            systems: Vec::new(),
        }
    }

    /// The resolution scale of this sheet.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Appends a new empty system and returns it. System ids start at 1.
    pub fn add_system(&mut self) -> &mut SystemInfo {
        let id = self.systems.len() + 1;
        self.systems.push(SystemInfo::new(id));
        self.systems.last_mut().expect("system was just pushed")
    }

    /// The system with the given id, if present.
    pub fn system(&self, id: usize) -> Option<&SystemInfo> {
        self.systems.iter().find(|s| s.id() == id)
    }

    /// All systems of the sheet.
    pub fn systems(&self) -> &[SystemInfo] {
        &self.systems
    }

    /// Mutable access to all systems.
    pub fn systems_mut(&mut self) -> &mut [SystemInfo] {
        &mut self.systems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_ids_start_at_one() {
        let mut sheet = Sheet::new(Scale::new(16));
        sheet.add_system();
        sheet.add_system();
        assert_eq!(sheet.systems().len(), 2);
        assert_eq!(sheet.system(1).unwrap().id(), 1);
        assert_eq!(sheet.system(2).unwrap().id(), 2);
        assert!(sheet.system(3).is_none());
    }
}
