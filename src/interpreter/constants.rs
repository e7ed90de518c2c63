// Constants for the pointer lesson

/// Starting address for stack slots (frame 0, slot 0)
pub const STACK_ADDRESS_START: u64 = 0x0000_0004;

/// Starting address for process-lifetime (static) slots
pub const STATIC_ADDRESS_START: u64 = 0x0800_0000;

/// Bytes reserved per slot; a Point (two doubles) is the widest value
pub const SLOT_SIZE: u64 = 0x10;

/// Slots per frame with distinct addresses. A frame with more locals still
/// works, but its displayed addresses run into the next frame's range.
pub const MAX_FRAME_SLOTS: u64 = 64;

/// Address distance between the arenas of consecutive call depths
pub const FRAME_ADDRESS_STRIDE: u64 = MAX_FRAME_SLOTS * SLOT_SIZE;

/// Name and initial value of the lesson's global variable
pub const GLOBAL_NAME: &str = "global_value";
pub const GLOBAL_INITIAL_VALUE: i32 = 101;

/// Value of the local whose address `dangling_local()` leaks
pub const DANGLING_LOCAL_VALUE: i32 = 42;

/// Snapshot history limit (64 MB)
pub const SNAPSHOT_MEMORY_LIMIT: usize = 64 * 1024 * 1024;

/// Exit status after a stopped invalid dereference (128 + SIGSEGV)
pub const FAULT_EXIT_CODE: i32 = 139;
