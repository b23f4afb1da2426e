use crate::radio::rf24::bit_fields::{Config, SetupRetry, SetupRf};
use crate::{CrcLength, DataRate, PaLevel};

/// The address width (in bytes) used for every pipe.
pub const ADDRESS_WIDTH: usize = 5;

/// The highest channel supported by the nRF24L01.
pub const MAX_CHANNEL: u8 = 125;

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use rf24link::radio::RadioConfig;
/// let mut config = RadioConfig::default();
/// config = config.with_channel(42);
/// ```
///
/// The address width is fixed to 5 bytes and the auto-ACK feature is always disabled.
/// Neither can be changed with this builder.
#[derive(Debug, Clone, Copy)]
pub struct RadioConfig {
    pub(crate) config_reg: Config,
    pub(crate) auto_retries: SetupRetry,
    pub(crate) setup_rf: SetupRf,
    channel: u8,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `76` |
    /// | [`RadioConfig::address_length()`] | `5` (fixed) |
    /// | [`RadioConfig::auto_ack()`] | `false` (fixed) |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::lna_enable()`] | `true` |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit8`] |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Kbps250`] |
    /// | [`RadioConfig::auto_retry_delay()`] | `15` |
    /// | [`RadioConfig::auto_retry_count()`] | `15` |
    fn default() -> Self {
        Self {
            /*
               - all events enabled for IRQ pin
               - 8 bit CRC
               - powered down
               - inactive TX (StandBy-I) mode
            */
            config_reg: Config::default(),
            /*
               - 15 * 250 + 250 = 4000 us delay between attempts
               - 15 max attempts
               (unused while auto-ACK is disabled)
            */
            auto_retries: SetupRetry::default(),
            /*
                - 250 Kbps data rate
                - Max PA level
                - LNA enabled
            */
            setup_rf: SetupRf::default(),
            channel: 76,
        }
    }
}

impl RadioConfig {
    /// Returns the value set by [`RadioConfig::with_crc_length()`].
    pub const fn crc_length(&self) -> CrcLength {
        self.config_reg.crc_length()
    }

    /// The Cyclical Redundancy Checksum (CRC) length.
    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_config = self.config_reg.with_crc_length(length);
        Self {
            config_reg: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.setup_rf.data_rate()
    }

    /// The Data Rate (over the air).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_config = self.setup_rf.with_data_rate(data_rate);
        Self {
            setup_rf: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.setup_rf.pa_level()
    }

    /// The Power Amplitude (PA) level.
    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_config = self.setup_rf.with_pa_level(level);
        Self {
            setup_rf: new_config,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_lna_enable()`].
    pub const fn lna_enable(&self) -> bool {
        self.setup_rf.lna_enable()
    }

    /// Enable or disable the chip's Low Noise Amplifier (LNA) feature.
    ///
    /// This value may not be respected depending on the radio module used.
    pub fn with_lna_enable(self, enable: bool) -> Self {
        let new_config = self.setup_rf.with_lna_enable(enable);
        Self {
            setup_rf: new_config,
            ..self
        }
    }

    /// The address length. Always 5 bytes.
    pub const fn address_length(&self) -> u8 {
        ADDRESS_WIDTH as u8
    }

    /// Is the auto-ACK feature enabled? Always `false`.
    ///
    /// Delivery is made reliable by retrying at the application layer instead.
    /// See [`Messenger::send()`](fn@crate::messaging::Messenger::send).
    pub const fn auto_ack(&self) -> bool {
        false
    }

    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Set the channel (over the air frequency).
    ///
    /// This value is clamped to range [0, 125].
    /// The radio's frequency can be determined by the following equation:
    /// ```text
    /// frequency (in MHz) = channel + 2400
    /// ```
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value.min(MAX_CHANNEL),
            ..self
        }
    }

    /// The auto-retry feature's `delay` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn auto_retry_delay(&self) -> u8 {
        self.auto_retries.ard()
    }

    /// The auto-retry feature's `count` (set via [`RadioConfig::with_auto_retries()`])
    pub const fn auto_retry_count(&self) -> u8 {
        self.auto_retries.arc()
    }

    /// Set the SETUP_RETR register's `delay` and `count` parameters.
    ///
    /// Both values are clamped to 15. These have no effect on the air because auto-ACK
    /// is disabled; application-level retries are controlled by the `max_retries`
    /// parameter of [`Messenger::send()`](fn@crate::messaging::Messenger::send).
    pub fn with_auto_retries(self, delay: u8, count: u8) -> Self {
        let new_config = self
            .auto_retries
            .with_ard(delay.min(15))
            .with_arc(count.min(15));
        Self {
            auto_retries: new_config,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use super::RadioConfig;
    use crate::{CrcLength, DataRate, PaLevel};

    #[test]
    fn crc_length() {
        let mut config = RadioConfig::default();
        assert_eq!(config.crc_length(), CrcLength::Bit8);
        for len in [CrcLength::Disabled, CrcLength::Bit16, CrcLength::Bit8] {
            config = config.with_crc_length(len);
            assert_eq!(len, config.crc_length());
        }
    }

    #[test]
    fn register_images() {
        let config = RadioConfig::default();
        assert_eq!(config.config_reg.into_bits(), 0x08);
        assert_eq!(config.setup_rf.into_bits(), 0x27);
        assert_eq!(config.auto_retries.into_bits(), 0xFF);
    }

    #[test]
    fn fixed_features() {
        let config = RadioConfig::default();
        assert_eq!(config.address_length(), 5);
        assert!(!config.auto_ack());
    }

    #[test]
    fn pa_level() {
        let mut config = RadioConfig::default();
        for level in [PaLevel::Max, PaLevel::High, PaLevel::Low, PaLevel::Min] {
            config = config.with_pa_level(level);
            assert_eq!(config.pa_level(), level);
        }
        assert!(config.lna_enable());
        config = config.with_lna_enable(false);
        assert!(!config.lna_enable());
    }

    #[test]
    fn data_rate() {
        let mut config = RadioConfig::default();
        assert_eq!(config.data_rate(), DataRate::Kbps250);
        for rate in [DataRate::Kbps250, DataRate::Mbps1, DataRate::Mbps2] {
            config = config.with_data_rate(rate);
            assert_eq!(config.data_rate(), rate);
        }
        // 2 Mbps at max PA with LNA
        assert_eq!(config.setup_rf.into_bits(), 0x0F);
    }

    #[test]
    fn channel() {
        let config = RadioConfig::default();
        assert_eq!(config.channel(), 76);
        let config = config.with_channel(255);
        assert_eq!(config.channel(), 125);
    }

    #[test]
    fn auto_retries() {
        let mut config = RadioConfig::default();
        assert_eq!(config.auto_retry_count(), 15);
        assert_eq!(config.auto_retry_delay(), 15);
        config = config.with_auto_retries(20, 3);
        assert_eq!(config.auto_retry_count(), 3);
        assert_eq!(config.auto_retry_delay(), 15);
        assert_eq!(config.auto_retries.into_bits(), 0xF3);
    }
}
