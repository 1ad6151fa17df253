/// Tile span of one resource bank. Banks are squares.
pub const BANK_SIZE: i32 = 8;
/// Number of world maps present on an OSI-like shard.
pub const NUMBER_OF_MAPS: u8 = 6;
/// Distance from a walkable tile to the furthest tile it can gather from.
pub const SCAN_RADIUS: u32 = 2;
/// Distance from the agent to the furthest tile of the window.
pub const VISIBLE_RANGE: u32 = 16;
/// Polling cadence of the controller loop.
pub const TICK_INTERVAL_MS: u64 = 100;
/// Number of ticks between two movement checks.
pub const UPDATE_EVERY_TICKS: u32 = 5;
pub const SAVE_KEY: &str = "S";
pub const STORE_PATH: &str = "mining-spots.txt";
pub const SAVE_CONFIRMATION: &str = "Mining Spot Saved!";

/// Mountain land tiles that can be mined.
///
/// Only tiles that are reachable or visible in the majority of cases are
/// listed; some tiles occasionally behave as resource tiles but are usually
/// blocked by line of sight.
pub const MOUNTAIN_RESOURCE_TILES: &[u16] = &[
    0xDC, 0xDD, 0xDE, 0xDF, 0xE0, 0xE1, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xEC, 0xED, 0xEE,
    0xEF, 0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xFC, 0xFD, 0xFE, 0xFF, 0x100, 0x101,
    0x102, 0x103, 0x104, 0x105, 0x106, 0x107, 0x10C, 0x10D, 0x10E, 0x10F, 0x110, 0x111, 0x112,
    0x113, 0x114, 0x115, 0x116, 0x117, 0x11E, 0x11F, 0x120, 0x121, 0x122, 0x123, 0x124, 0x125,
    0x126, 0x127, 0x128, 0x129, 0x141, 0x142, 0x143, 0x144, 0x1D3, 0x1D4, 0x1D5, 0x1D6, 0x1D7,
    0x1D8, 0x1D9, 0x1DA, 0x1DC, 0x1DD, 0x1DE, 0x1DF, 0x1E0, 0x1E1, 0x1E2, 0x1E3, 0x1E4, 0x1E5,
    0x1E6, 0x1E7, 0x1EC, 0x1ED, 0x1EE, 0x1EF, 0x231, 0x232, 0x233, 0x234, 0x235, 0x236, 0x237,
    0x238, 0x239, 0x23A, 0x23B, 0x23C, 0x23D, 0x23E, 0x23F, 0x240, 0x241, 0x242, 0x243, 0x6CD,
    0x6CE, 0x6CF, 0x6D0, 0x6D1, 0x6D2, 0x6D3, 0x6D4, 0x6D5, 0x6D6, 0x6D7, 0x6D8, 0x6D9, 0x709,
    0x70A, 0x70B, 0x70C, 0x70D, 0x70E, 0x70F, 0x710, 0x711, 0x713, 0x714, 0x715, 0x716, 0x717,
    0x718, 0x719, 0x71A, 0x71B, 0x71C, 0x727, 0x728, 0x729, 0x72A, 0x72B, 0x72C, 0x72D, 0x72E,
    0x72F, 0x730, 0x731, 0x732, 0x733, 0x734, 0x735, 0x736, 0x737, 0x738, 0x739, 0x73A, 0x7BD,
    0x7BE, 0x7BF, 0x7C0, 0x7C1, 0x7C2, 0x7C3, 0x7C4, 0x7C5, 0x7C6, 0x7C7, 0x7C8, 0x7C9, 0x7CA,
    0x7CB, 0x7CC, 0x7CD, 0x7CE, 0x7CF, 0x7D0,
];

/// Cave floor land tiles that can be mined.
pub const CAVE_RESOURCE_TILES: &[u16] = &[
    0x245, 0x246, 0x247, 0x248, 0x249, 0x24A, 0x24B, 0x24C, 0x24D, 0x24E, 0x24F, 0x250, 0x251,
    0x252, 0x253, 0x254, 0x255, 0x256, 0x257, 0x258, 0x259, 0x262, 0x263, 0x264, 0x265,
];

/// Rock tiles, normally part of mountains. Not minable, drawn apart from
/// plain tiles.
pub const ROCK_TILES: &[u16] = &[
    0x21F, 0x220, 0x221, 0x222, 0x223, 0x224, 0x225, 0x226, 0x227, 0x228, 0x229, 0x22A, 0x22B,
    0x22C, 0x22D, 0x22E, 0x22F, 0x230, 0x3F2, 0x6DA, 0x6DB, 0x6DC, 0x6DD, 0x6EB, 0x6EC, 0x6ED,
    0x6EE, 0x6EF, 0x6F0, 0x6F1, 0x6F2, 0x6F3, 0x6F4, 0x6F5, 0x6F6, 0x6F7, 0x6F8, 0x6F9, 0x6FA,
    0x6FB, 0x6FC, 0x6FD, 0x6FE, 0x71D, 0x71E, 0x71F, 0x720, 0x73B, 0x73C, 0x73D, 0x73E, 0x745,
    0x746, 0x747, 0x748, 0x749, 0x74A, 0x74B, 0x74C, 0x74D, 0x74E, 0x74F, 0x750, 0x751, 0x752,
    0x753, 0x754, 0x755, 0x756, 0x757, 0x758, 0x759, 0x75A, 0x75B, 0x75C, 0x7D1, 0x7D2, 0x7D3,
    0x7D4, 0x7EC, 0x7ED, 0x7EE, 0x7EF, 0x7F0, 0x7F1, 0x834, 0x835, 0x836, 0x837, 0x838, 0x839,
    0x453B, 0x453C, 0x453D, 0x453E, 0x453F, 0x4540, 0x4541, 0x4542, 0x4543, 0x4544, 0x4545,
    0x4546, 0x4547, 0x4548, 0x4549, 0x454A, 0x454B, 0x454C, 0x454D, 0x454E, 0x454F,
];

/// All mineable land tiles.
pub fn mineable_tiles() -> impl Iterator<Item = u16> {
    MOUNTAIN_RESOURCE_TILES
        .iter()
        .chain(CAVE_RESOURCE_TILES.iter())
        .copied()
}
