/// All tunables for one game session. Passed to `Game::new`; there is no
/// process-wide mutable configuration.
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Playfield width in columns.
    pub width: i32,
    /// Playfield height in rows.
    pub height: i32,
    /// Starting resources for each role.
    pub start_resources: u32,
    /// Defender lives; reaching zero loses the game.
    pub start_lives: i32,
    /// Resource pools are clamped to this every tick.
    pub max_resources: u32,
    /// The wave-limit terminal condition triggers at this wave count.
    pub max_waves: u32,
    /// Queue draining stops while this many enemies are on the field.
    pub max_live_enemies: usize,
    /// Queued enemies spawned per tick, at most.
    pub queue_drain_per_tick: usize,
    /// Vertical extent of the zigzag as a fraction of the height.
    pub path_band_fraction: f64,
    /// Horizontal extent of the zigzag as a fraction of the width.
    pub path_span_fraction: f64,
    /// Simulation rate the host driver is expected to run at.
    pub tick_hz: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 14,
            start_resources: 300,
            start_lives: 20,
            max_resources: 800,
            max_waves: 30,
            max_live_enemies: 30,
            queue_drain_per_tick: 3,
            path_band_fraction: 0.2,
            path_span_fraction: 0.6,
            tick_hz: 10,
        }
    }
}
