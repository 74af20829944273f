use std::collections::BTreeSet;

use isd_spectra::data::PlotSeries;
use isd_spectra::pipeline::Spectra;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Which table the plot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectraSet {
    Chosen,
    All,
}

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// Shown in the top bar, usually the output base name.
    pub title: String,

    chosen: Vec<PlotSeries>,
    all: Vec<PlotSeries>,

    /// Table currently plotted.
    pub set: SpectraSet,

    /// Labels of curves switched off in the side panel.
    pub hidden: BTreeSet<String>,

    /// Colour per curve of the current set.
    pub color_map: ColorMap,

    /// Scale each curve to [0, 1] before plotting.
    pub minmax_scaling: bool,

    /// Status / warning message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn new(title: impl Into<String>, spectra: &Spectra) -> Self {
        let status_message = match spectra.skipped.len() {
            0 => None,
            1 => Some("1 file skipped (see log)".to_string()),
            n => Some(format!("{n} files skipped (see log)")),
        };
        let mut state = ViewerState {
            title: title.into(),
            chosen: spectra.chosen.series(),
            all: spectra.all.series(),
            set: SpectraSet::Chosen,
            hidden: BTreeSet::new(),
            color_map: ColorMap::default(),
            minmax_scaling: false,
            status_message,
        };
        state.rebuild_color_map();
        state
    }

    /// Curves of the current set, hidden ones included.
    pub fn series(&self) -> &[PlotSeries] {
        match self.set {
            SpectraSet::Chosen => &self.chosen,
            SpectraSet::All => &self.all,
        }
    }

    pub fn visible_series(&self) -> impl Iterator<Item = &PlotSeries> {
        let hidden = &self.hidden;
        self.series()
            .iter()
            .filter(move |s| !hidden.contains(&s.label))
    }

    pub fn is_visible(&self, label: &str) -> bool {
        !self.hidden.contains(label)
    }

    /// Switch tables; visibility is reset and colours reassigned.
    pub fn set_spectra_set(&mut self, set: SpectraSet) {
        if self.set == set {
            return;
        }
        self.set = set;
        self.hidden.clear();
        self.rebuild_color_map();
    }

    pub fn toggle(&mut self, label: &str) {
        if !self.hidden.remove(label) {
            self.hidden.insert(label.to_string());
        }
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    pub fn hide_all(&mut self) {
        self.hidden = self.series().iter().map(|s| s.label.clone()).collect();
    }

    fn rebuild_color_map(&mut self) {
        self.color_map = ColorMap::new(self.series().iter().map(|s| s.label.as_str()));
    }
}

/// Powers as plotted: raw, or min–max scaled to [0, 1].
pub fn plotted_powers(series: &PlotSeries, minmax_scaling: bool) -> Vec<f64> {
    if !minmax_scaling {
        return series.powers.clone();
    }
    let min = series.powers.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = series.powers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        vec![0.0; series.powers.len()]
    } else {
        series.powers.iter().map(|&p| (p - min) / range).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isd_spectra::data::align::align;
    use isd_spectra::data::select::select;
    use isd_spectra::data::{DriveCurrent, SpectralTable, SpectrumSample};

    fn spectra() -> Spectra {
        let tables = ["0.1", "0.2", "0.5", "1"].iter().map(|current| {
            let samples = [
                SpectrumSample { wavelength: 500.0, power: 1.0 },
                SpectrumSample { wavelength: 501.0, power: 3.0 },
            ];
            SpectralTable::from_samples(DriveCurrent::from_header(current), &samples)
        });
        let all = align(tables).unwrap();
        let chosen = select(&all, Some(&[0.5, 1.0][..])).unwrap();
        Spectra {
            all,
            chosen,
            files_found: 4,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_starts_on_chosen_set() {
        let state = ViewerState::new("sweep", &spectra());
        let legends: Vec<&str> = state.series().iter().map(|s| s.legend.as_str()).collect();
        assert_eq!(legends, vec!["5.00E-04 A", "1.00E-03 A"]);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_toggle_and_switch_set() {
        let mut state = ViewerState::new("sweep", &spectra());
        state.toggle("0.5 mA");
        assert!(!state.is_visible("0.5 mA"));
        assert_eq!(state.visible_series().count(), 1);

        state.toggle("0.5 mA");
        assert_eq!(state.visible_series().count(), 2);

        state.hide_all();
        assert_eq!(state.visible_series().count(), 0);

        state.set_spectra_set(SpectraSet::All);
        assert_eq!(state.visible_series().count(), 4);
    }

    #[test]
    fn test_currents_sharing_a_legend_stay_separate() {
        let tables = ["1", "1.004"].iter().map(|current| {
            let samples = [SpectrumSample { wavelength: 500.0, power: 1.0 }];
            SpectralTable::from_samples(DriveCurrent::from_header(current), &samples)
        });
        let all = align(tables).unwrap();
        let spectra = Spectra {
            chosen: all.clone(),
            all,
            files_found: 2,
            skipped: Vec::new(),
        };
        let mut state = ViewerState::new("sweep", &spectra);
        let legends: Vec<&str> = state.series().iter().map(|s| s.legend.as_str()).collect();
        assert_eq!(legends, vec!["1.00E-03 A", "1.00E-03 A"]);

        state.toggle("1 mA");
        assert!(!state.is_visible("1 mA"));
        assert!(state.is_visible("1.004 mA"));
        assert_eq!(state.visible_series().count(), 1);
        assert_ne!(
            state.color_map.color_for("1 mA"),
            state.color_map.color_for("1.004 mA")
        );
    }

    #[test]
    fn test_minmax_scaling() {
        let series = PlotSeries {
            label: "x mA".to_string(),
            legend: "x".to_string(),
            wavelengths: vec![1.0, 2.0, 3.0],
            powers: vec![2.0, 4.0, 6.0],
        };
        assert_eq!(plotted_powers(&series, false), vec![2.0, 4.0, 6.0]);
        assert_eq!(plotted_powers(&series, true), vec![0.0, 0.5, 1.0]);

        let flat = PlotSeries { powers: vec![1.0, 1.0], ..series };
        assert_eq!(plotted_powers(&flat, true), vec![0.0, 0.0]);
    }
}
