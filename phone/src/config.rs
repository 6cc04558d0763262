use audio::AudioConfig;
use codec::AudioFormat;

/// Configuration of a [`Phone`](crate::Phone)
#[derive(Debug, Clone)]
pub struct PhoneConfig {
    /// Register at this URI on [`Phone::register`](crate::Phone::register), no registration if `None`
    pub register_uri: Option<String>,

    /// User name answered to authentication challenges, asked from the UI if unset
    pub auth_user: Option<String>,

    /// Password belonging to [`auth_user`](Self::auth_user)
    pub auth_password: Option<String>,

    /// Audio formats in order of preference, used when negotiating the format of a call
    ///
    /// Default: `[PCMU, GSM]`
    pub format_preference: Vec<AudioFormat>,

    /// Dynamic payload type used for Speex
    ///
    /// Default: `110`
    pub speex_pt: u8,

    /// Payload type of telephone-events advertised in the local SDP
    ///
    /// Default: `101`
    pub dtmf_pt: u8,

    /// Passed to the audio backend when the device is acquired
    pub audio: AudioConfig,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            register_uri: None,
            auth_user: None,
            auth_password: None,
            format_preference: vec![AudioFormat::Pcmu, AudioFormat::Gsm],
            speex_pt: 110,
            dtmf_pt: 101,
            audio: AudioConfig::default(),
        }
    }
}

impl PhoneConfig {
    /// Payload type a format is sent with, either static or one of the configured dynamic ones
    pub fn payload_type(&self, format: AudioFormat) -> Option<u8> {
        match format {
            AudioFormat::Speex => Some(self.speex_pt),
            _ => format.static_pt(),
        }
    }

    /// Reverse of [`payload_type`](Self::payload_type)
    pub fn format_for_payload_type(&self, pt: u8) -> Option<AudioFormat> {
        if pt == self.speex_pt {
            return Some(AudioFormat::Speex);
        }

        AudioFormat::from_static_pt(pt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_type_mapping() {
        let config = PhoneConfig {
            speex_pt: 97,
            ..Default::default()
        };

        assert_eq!(config.payload_type(AudioFormat::Speex), Some(97));
        assert_eq!(config.payload_type(AudioFormat::Gsm), Some(3));
        assert_eq!(config.payload_type(AudioFormat::Raw), None);

        assert_eq!(config.format_for_payload_type(97), Some(AudioFormat::Speex));
        assert_eq!(config.format_for_payload_type(110), None);
        assert_eq!(config.format_for_payload_type(13), Some(AudioFormat::Cn));
    }
}
