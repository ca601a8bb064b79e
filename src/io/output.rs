use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, Device, FromSample, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig,
    SupportedBufferSize, SupportedStreamConfig,
};
use tracing::{info, warn};

use crate::{
    engine::AudioEngine,
    error::{SynthError, SynthResult},
};

/// Lifecycle of the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Stream built but not yet playing.
    NotReady,
    Running,
    Stopped,
}

/// The device stream driving an `AudioEngine`.
///
/// The engine moves into the driver callback; dropping this value drops the
/// stream and with it the engine.
pub struct AudioOutput {
    stream: Stream,
    config: StreamConfig,
    format: SampleFormat,
    state: DeviceState,
}

impl AudioOutput {
    /// Open the default output device and build a stream around `engine`.
    pub fn open(engine: AudioEngine) -> SynthResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(SynthError::NoOutputDevice)?;
        Self::open_on(&device, engine)
    }

    pub fn open_on(device: &Device, mut engine: AudioEngine) -> SynthResult<Self> {
        let (config, format) = choose_config(device, &engine)?;
        engine.set_sample_rate(config.sample_rate.0);

        let stream = match format {
            SampleFormat::I16 => build_stream::<i16>(device, &config, engine)?,
            SampleFormat::F32 => build_stream::<f32>(device, &config, engine)?,
            SampleFormat::U16 => build_stream::<u16>(device, &config, engine)?,
            other => return Err(SynthError::UnsupportedFormat(format!("{other:?}"))),
        };

        info!(
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            ?format,
            buffer = ?config.buffer_size,
            "output stream built"
        );

        Ok(Self {
            stream,
            config,
            format,
            state: DeviceState::NotReady,
        })
    }

    pub fn start(&mut self) -> SynthResult<()> {
        self.stream.play()?;
        self.state = DeviceState::Running;
        info!("output stream running");
        Ok(())
    }

    pub fn stop(&mut self) -> SynthResult<()> {
        if self.state == DeviceState::Running {
            self.stream.pause()?;
            self.state = DeviceState::Stopped;
            info!("output stream stopped");
        }
        Ok(())
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == DeviceState::Running
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }
}

/// Mono i16 at the engine rate with a fixed buffer when the device offers
/// it, otherwise the device default.
fn choose_config(
    device: &Device,
    engine: &AudioEngine,
) -> SynthResult<(StreamConfig, SampleFormat)> {
    let wanted = engine.config();
    let rate = SampleRate(wanted.sample_rate);

    let preferred = device.supported_output_configs().ok().and_then(|mut ranges| {
        ranges.find(|range| {
            range.sample_format() == SampleFormat::I16
                && range.channels() == wanted.channels
                && range.min_sample_rate() <= rate
                && rate <= range.max_sample_rate()
        })
    });

    let supported: SupportedStreamConfig = match preferred {
        Some(range) => range.with_sample_rate(rate),
        None => {
            let fallback = device.default_output_config()?;
            warn!(
                format = ?fallback.sample_format(),
                channels = fallback.channels(),
                sample_rate = fallback.sample_rate().0,
                "device lacks mono i16, converting to default format"
            );
            fallback
        }
    };

    let buffer_size = match supported.buffer_size() {
        SupportedBufferSize::Range { min, max }
            if (*min..=*max).contains(&wanted.buffer_size) =>
        {
            BufferSize::Fixed(wanted.buffer_size)
        }
        _ => BufferSize::Default,
    };

    let format = supported.sample_format();
    let mut config: StreamConfig = supported.into();
    config.buffer_size = buffer_size;
    Ok((config, format))
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut engine: AudioEngine,
) -> SynthResult<Stream>
where
    T: SizedSample + FromSample<i16>,
{
    let channels = config.channels as usize;
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _| engine.render_interleaved(data, channels),
        |err| warn!(%err, "output stream error"),
        None,
    )?;
    Ok(stream)
}
