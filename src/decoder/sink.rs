//! PCM output destination.

/// Receives decoded PCM samples from the driver.
///
/// Samples arrive in chunks no larger than the configured
/// `max_output_chunk_size`.
pub trait PcmSink {
    /// Write a chunk of interleaved samples.
    fn write_pcm(&mut self, samples: &[i16]);
}

impl<F> PcmSink for F
where
    F: FnMut(&[i16]),
{
    fn write_pcm(&mut self, samples: &[i16]) {
        self(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut collected = Vec::new();
        {
            let mut sink = |samples: &[i16]| collected.extend_from_slice(samples);
            sink.write_pcm(&[1, 2]);
            sink.write_pcm(&[3]);
        }
        assert_eq!(collected, vec![1, 2, 3]);
    }
}
