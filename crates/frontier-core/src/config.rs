//! Configuration loading and typed config structures for Frontier.
//!
//! The canonical configuration lives in `frontier-config.yaml` at the
//! project root. Every section and every field has a default, so an empty
//! file (or no file) yields a playable game.
//!
//! Environment variables override file values:
//! - `FRONTIER_ITEMS_PATH` overrides `catalogs.items_path`
//! - `FRONTIER_RECIPES_PATH` overrides `catalogs.recipes_path`
//! - `FRONTIER_LOG_LEVEL` overrides `logging.level`

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use frontier_agents::{BalanceConfig, ItemRegistry, RecipeRegistry};
use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrontierConfig {
    /// Map size, player limit, and timing.
    #[serde(default)]
    pub game: GameConfig,

    /// Gameplay balance.
    #[serde(default)]
    pub balance: BalanceConfig,

    /// World generation and resource spawning.
    #[serde(default)]
    pub spawning: SpawningConfig,

    /// Item and recipe catalog locations.
    #[serde(default)]
    pub catalogs: CatalogConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FrontierConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] or [`ConfigError::Invalid`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("FRONTIER_ITEMS_PATH") {
            self.catalogs.items_path = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("FRONTIER_RECIPES_PATH") {
            self.catalogs.recipes_path = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("FRONTIER_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.width == 0 || self.game.height == 0 {
            return Err(ConfigError::Invalid {
                field: "game.width",
                reason: "map dimensions must be non-zero".to_owned(),
            });
        }
        if self.game.max_players == 0 {
            return Err(ConfigError::Invalid {
                field: "game.max_players",
                reason: "at least one player is required".to_owned(),
            });
        }
        if self.game.decision_margin_ms >= self.game.tick_interval_ms {
            return Err(ConfigError::Invalid {
                field: "game.decision_margin_ms",
                reason: "margin must be shorter than the tick interval".to_owned(),
            });
        }
        self.spawning.validate()
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Map size, player limit, and timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Map width in tiles.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Map height in tiles.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Maximum players per game.
    #[serde(default = "default_max_players")]
    pub max_players: u32,

    /// Tick at which the game ends.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Milliseconds reserved at the end of a tick for resolution; decision
    /// makers get the rest of the interval.
    #[serde(default = "default_decision_margin_ms")]
    pub decision_margin_ms: u64,

    /// Random seed. A fixed seed reproduces the map and spawns.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameConfig {
    /// How long a decision maker may take before it forfeits the tick.
    pub const fn decision_deadline(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.saturating_sub(self.decision_margin_ms))
    }

    /// Real-time length of a tick.
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            max_players: default_max_players(),
            max_ticks: default_max_ticks(),
            tick_interval_ms: default_tick_interval_ms(),
            decision_margin_ms: default_decision_margin_ms(),
            seed: None,
        }
    }
}

const fn default_width() -> u32 {
    32
}

const fn default_height() -> u32 {
    32
}

const fn default_max_players() -> u32 {
    8
}

const fn default_max_ticks() -> u64 {
    300
}

const fn default_tick_interval_ms() -> u64 {
    2000
}

const fn default_decision_margin_ms() -> u64 {
    250
}

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// World generation and resource spawning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawningConfig {
    /// Probability per tick that a new resource node appears.
    pub resource_spawn_chance: f64,
    /// One resource node allowed per this many tiles of map area.
    pub tiles_per_resource: u32,
    /// Smallest yield of a new node.
    pub min_yield: u32,
    /// Largest yield of a new node.
    pub max_yield: u32,
    /// Nodes placed when the world is generated.
    pub initial_resources: u32,
    /// Percent of tiles that become forest.
    pub forest_pct: u32,
    /// Percent of tiles that become desert.
    pub desert_pct: u32,
    /// Percent of tiles that become mountain.
    pub mountain_pct: u32,
    /// Percent of tiles that become water.
    pub water_pct: u32,
    /// Shrines placed at generation.
    pub shrines: u32,
    /// Caches placed at generation.
    pub caches: u32,
    /// Linked portal pairs placed at generation.
    pub portal_pairs: u32,
    /// Obelisks placed at generation.
    pub obelisks: u32,
    /// Item ids a cache may hold.
    pub cache_loot: Vec<String>,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            resource_spawn_chance: 0.3,
            tiles_per_resource: 30,
            min_yield: 3,
            max_yield: 8,
            initial_resources: 12,
            forest_pct: 25,
            desert_pct: 15,
            mountain_pct: 6,
            water_pct: 4,
            shrines: 2,
            caches: 3,
            portal_pairs: 1,
            obelisks: 2,
            cache_loot: vec![
                "health_potion".to_owned(),
                "energy_drink".to_owned(),
                "iron_ingot".to_owned(),
                "lucky_charm".to_owned(),
            ],
        }
    }
}

impl SpawningConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.resource_spawn_chance) {
            return Err(ConfigError::Invalid {
                field: "spawning.resource_spawn_chance",
                reason: "must be between 0 and 1".to_owned(),
            });
        }
        if self.tiles_per_resource == 0 {
            return Err(ConfigError::Invalid {
                field: "spawning.tiles_per_resource",
                reason: "must be non-zero".to_owned(),
            });
        }
        if self.min_yield == 0 || self.min_yield > self.max_yield {
            return Err(ConfigError::Invalid {
                field: "spawning.min_yield",
                reason: "yield range must be non-empty and start above zero".to_owned(),
            });
        }
        let terrain_total = [
            self.forest_pct,
            self.desert_pct,
            self.mountain_pct,
            self.water_pct,
        ]
        .iter()
        .fold(0_u32, |acc, p| acc.saturating_add(*p));
        if terrain_total > 100 {
            return Err(ConfigError::Invalid {
                field: "spawning.forest_pct",
                reason: format!("terrain percentages add up to {terrain_total}"),
            });
        }
        Ok(())
    }

    /// Maximum resource nodes on a map of the given area.
    pub fn max_resources(&self, area: u64) -> u64 {
        area.checked_div(u64::from(self.tiles_per_resource))
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Item and recipe catalog locations. `None` uses the built-in catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Path to the item catalog JSON.
    #[serde(default)]
    pub items_path: Option<PathBuf>,

    /// Path to the recipe catalog JSON.
    #[serde(default)]
    pub recipes_path: Option<PathBuf>,
}

/// Loaded, read-only catalogs shared by every game.
#[derive(Debug, Clone)]
pub struct Catalogs {
    /// Item definitions.
    pub items: Arc<ItemRegistry>,
    /// Crafting recipes.
    pub recipes: Arc<RecipeRegistry>,
}

impl Catalogs {
    /// The catalogs bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Catalog`] if the bundled data is malformed.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::load(&CatalogConfig::default())
    }

    /// Load catalogs from the configured paths, falling back to the
    /// bundled data for any path not set. Recipes are checked against the
    /// item catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Catalog`] if a file cannot be read or parsed,
    /// or a recipe names an unknown item.
    pub fn load(config: &CatalogConfig) -> Result<Self, ConfigError> {
        let items = match &config.items_path {
            Some(path) => ItemRegistry::from_file(path)?,
            None => ItemRegistry::builtin()?,
        };
        let recipes = match &config.recipes_path {
            Some(path) => RecipeRegistry::from_file(path)?,
            None => RecipeRegistry::builtin()?,
        };
        recipes.validate(&items)?;
        tracing::info!(
            items = items.len(),
            recipes = recipes.len(),
            "catalogs loaded"
        );
        Ok(Self {
            items: Arc::new(items),
            recipes: Arc::new(recipes),
        })
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FrontierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.game.width, 32);
        assert_eq!(config.balance.max_hp, 100);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.game.decision_deadline(),
            Duration::from_millis(1750)
        );
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = "
game:
  width: 16
  height: 12
  seed: 7
balance:
  coins_per_kill: 25
spawning:
  resource_spawn_chance: 0.5
logging:
  json: true
";
        let config: FrontierConfig = serde_yml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.game.width, 16);
        assert_eq!(config.game.seed, Some(7));
        assert_eq!(config.game.max_players, 8);
        assert_eq!(config.balance.coins_per_kill, 25);
        assert_eq!(config.balance.max_hp, 100);
        assert!(config.logging.json);
        assert_eq!(config.spawning.min_yield, 3);
    }

    #[test]
    fn parse_empty_yaml() {
        let config: Result<FrontierConfig, _> = serde_yml::from_str("{}");
        assert!(config.is_ok());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut env = BTreeMap::new();
        env.insert("FRONTIER_ITEMS_PATH", "/tmp/items.json");
        env.insert("FRONTIER_LOG_LEVEL", "debug");

        let mut config = FrontierConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| (*v).to_owned()));
        assert_eq!(
            config.catalogs.items_path,
            Some(PathBuf::from("/tmp/items.json"))
        );
        assert_eq!(config.catalogs.recipes_path, None);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut config = FrontierConfig::default();
        config.spawning.min_yield = 9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "spawning.min_yield", .. })
        ));

        let mut config = FrontierConfig::default();
        config.game.decision_margin_ms = config.game.tick_interval_ms;
        assert!(config.validate().is_err());

        let mut config = FrontierConfig::default();
        config.spawning.mountain_pct = 90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn builtin_catalogs_load() {
        let catalogs = Catalogs::builtin().unwrap();
        assert!(catalogs.items.contains("wood"));
        assert!(catalogs.recipes.get("smelt_iron").is_some());
    }

    #[test]
    fn max_resources_scales_with_area() {
        let spawning = SpawningConfig::default();
        assert_eq!(spawning.max_resources(900), 30);
        assert_eq!(spawning.max_resources(10), 0);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("frontier-config.yaml");
        if path.exists() {
            let config = FrontierConfig::from_file(&path);
            assert!(config.is_ok(), "failed to load project config: {config:?}");
        }
    }
}
