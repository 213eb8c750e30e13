use pyo3::pymodule;

mod messages;
mod sampler;

/// The Python module implemented in Rust.
#[pymodule]
mod pad_slicer_audio {
    #[pymodule_export]
    use super::sampler::PadSampler;

    #[pymodule_export]
    use super::sampler::detect_slices;

    #[pymodule_export]
    use super::messages::SlicerMessage;
}
