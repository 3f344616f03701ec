use std::cell::RefCell;
use std::rc::Rc;

/// Snapshot of the mounted container element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: Option<String>,
    pub class_name: Option<String>,
    /// Increments each time a container is (re)mounted by the same owner.
    pub mount_serial: u64,
}

/// Shared slot the orchestrator fills on mount and clears on unmount.
///
/// Hosts may clone the ref and inspect it after the orchestrator renders.
#[derive(Debug, Clone, Default)]
pub struct ContainerRef {
    slot: Rc<RefCell<Option<ContainerHandle>>>,
}

impl ContainerRef {
    #[must_use]
    pub fn get(&self) -> Option<ContainerHandle> {
        self.slot.borrow().clone()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.slot.borrow().is_some()
    }

    pub(crate) fn mount(&self, id: Option<String>, class_name: Option<String>) {
        let mut slot = self.slot.borrow_mut();
        let mount_serial = match slot.as_ref() {
            Some(handle) if handle.id == id && handle.class_name == class_name => {
                return;
            }
            Some(handle) => handle.mount_serial + 1,
            None => 1,
        };
        *slot = Some(ContainerHandle {
            id,
            class_name,
            mount_serial,
        });
    }

    pub(crate) fn unmount(&self) {
        self.slot.borrow_mut().take();
    }
}
