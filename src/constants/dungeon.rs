//! Dungeon generation constants.

/// Default dungeon width (X extent)
pub const DUNGEON_DEFAULT_WIDTH: i32 = 40;
/// Default dungeon length (Z extent)
pub const DUNGEON_DEFAULT_LENGTH: i32 = 40;
/// Default number of BSP splitting rounds (one round = one tree level)
pub const DUNGEON_DEFAULT_MAX_ITERATIONS: u32 = 5;
/// Default minimum width of a BSP leaf
pub const DUNGEON_DEFAULT_ROOM_WIDTH_MIN: i32 = 6;
/// Default minimum length of a BSP leaf
pub const DUNGEON_DEFAULT_ROOM_LENGTH_MIN: i32 = 6;
/// Default fraction of a leaf the bottom-left room corner may wander into
pub const DUNGEON_DEFAULT_BOTTOM_CORNER_MODIFIER: f32 = 0.25;
/// Default fraction of a leaf after which the top-right room corner is placed
pub const DUNGEON_DEFAULT_TOP_CORNER_MODIFIER: f32 = 0.75;
/// Default inset between a room and the edges of its leaf
pub const DUNGEON_DEFAULT_ROOM_OFFSET: i32 = 1;
/// Default corridor width in cells
pub const DUNGEON_DEFAULT_CORRIDOR_WIDTH: i32 = 2;

/// Largest accepted dungeon width or length. Keeps doubled centers and
/// split feasibility checks well inside `i32`.
pub const DUNGEON_MAX_EXTENT: i32 = 1 << 16;

/// Allowed range of the bottom corner modifier
pub const BOTTOM_CORNER_MODIFIER_RANGE: (f32, f32) = (0.0, 0.3);
/// Allowed range of the top corner modifier
pub const TOP_CORNER_MODIFIER_RANGE: (f32, f32) = (0.7, 1.0);
/// Allowed range of the room offset
pub const ROOM_OFFSET_RANGE: (i32, i32) = (0, 2);

/// How far a corridor reaches past the edge of the room it connects to.
/// Zero means the corridor's end edge sits exactly on the room's edge, so the
/// shared cells turn into doors.
pub const CORRIDOR_SEAM_OVERLAP: i32 = 0;
