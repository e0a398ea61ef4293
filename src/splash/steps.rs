//! The fixed loading narrative.

/// One checkpoint of the loading sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingStep {
    /// Percent complete, 0–100.
    pub progress: u8,
    pub label: &'static str,
}

pub const LOADING_STEPS: [LoadingStep; 7] = [
    LoadingStep { progress: 10, label: "Loading visual cortex..." },
    LoadingStep { progress: 25, label: "Initializing LED matrix..." },
    LoadingStep { progress: 40, label: "Connecting components..." },
    LoadingStep { progress: 60, label: "Starting synaptic pathways..." },
    LoadingStep { progress: 80, label: "Preparing neural networks..." },
    LoadingStep { progress: 95, label: "Starting mind processes..." },
    LoadingStep { progress: 100, label: "System ready" },
];
