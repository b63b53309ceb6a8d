use common::plot::Plot;
use summary::Summaries;
use violin::Violin;

/// Crates whose log output the binary filters alongside its own
pub const PLOT_CRATES: &[&str] = &["common", "violin", "summary"];

/// Forces every plot crate to be linked so their `type` tags resolve in `config.yaml`
pub fn init_plots() -> Vec<&'static str> {
    let plots: Vec<Box<dyn Plot>> = vec![Box::new(Violin::default()), Box::new(Summaries::default())];
    plots.iter().map(|p| p.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_plot() {
        assert_eq!(init_plots(), vec!["violin", "summary"]);
    }
}
