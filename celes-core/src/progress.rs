/// Optional progress callback wrapper. Absence of a callback is a no-op,
/// never an error.
pub struct ProgressReporter<'a> {
    callback: Option<&'a mut dyn FnMut(u8)>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(callback: &'a mut dyn FnMut(u8)) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// A reporter that discards all updates.
    pub fn none() -> Self {
        Self { callback: None }
    }

    pub fn report(&mut self, value: u8) {
        if let Some(callback) = self.callback.as_mut() {
            callback(value);
        }
    }
}

impl Default for ProgressReporter<'_> {
    fn default() -> Self {
        Self::none()
    }
}

/// The percentage window a scrape run reports into.
#[derive(Debug, Clone, Copy)]
pub struct ProgressRange {
    pub base: u8,
    pub range: u8,
}

impl Default for ProgressRange {
    fn default() -> Self {
        Self { base: 0, range: 100 }
    }
}

impl ProgressRange {
    /// The value reported when an adapter finishes all of its games.
    pub fn end(&self) -> u8 {
        self.base.saturating_add(self.range)
    }
}

/// Percentage reported after finishing game `game_index` (0-based) of
/// adapter `plugin_index` (0-based):
/// `base + floor((pluginIdx+1)/totalPlugins · (gameIdx+1)/gamesInPlugin · range)`.
pub fn scrape_progress(
    range: ProgressRange,
    plugin_index: usize,
    total_plugins: usize,
    game_index: usize,
    games_in_plugin: usize,
) -> u8 {
    if total_plugins == 0 || games_in_plugin == 0 {
        return range.base;
    }
    let plugin_share = (plugin_index + 1) as f64 / total_plugins as f64;
    let game_share = (game_index + 1) as f64 / games_in_plugin as f64;
    let offset = (plugin_share * game_share * f64::from(range.range)).floor();
    range.base.saturating_add(offset as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_decreasing_within_an_adapter() {
        let range = ProgressRange::default();
        let mut last = 0;
        for game in 0..10 {
            let value = scrape_progress(range, 0, 2, game, 10);
            assert!(value >= last, "progress dipped at game {game}");
            last = value;
        }
    }

    #[test]
    fn last_game_of_last_adapter_reaches_the_end() {
        let range = ProgressRange { base: 10, range: 80 };
        assert_eq!(scrape_progress(range, 1, 2, 4, 5), 90);
        assert_eq!(range.end(), 90);
    }

    #[test]
    fn empty_plugin_reports_base() {
        let range = ProgressRange { base: 25, range: 50 };
        assert_eq!(scrape_progress(range, 0, 1, 0, 0), 25);
    }

    #[test]
    fn reporter_without_callback_is_a_no_op() {
        let mut reporter = ProgressReporter::none();
        reporter.report(42);
    }

    #[test]
    fn reporter_forwards_values() {
        let mut seen = Vec::new();
        let mut callback = |value: u8| seen.push(value);
        let mut reporter = ProgressReporter::new(&mut callback);
        reporter.report(10);
        reporter.report(20);
        drop(reporter);
        assert_eq!(seen, vec![10, 20]);
    }
}
