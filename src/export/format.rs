use std::fmt;
use std::str::FromStr;

use crate::foundation::error::StickerError;

/// Encoder family, which decides the bitrate caps the planner applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatFamily {
    /// WebM (VP9/VP8): the platform's native sticker format.
    Primary,
    /// MP4/H.264: less efficient at these sizes, capped harder.
    Secondary,
    /// Palette images (GIF); not bitrate driven.
    Image,
}

/// What the bitrate planner needs to know about the output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FormatHint {
    pub family: FormatFamily,
    /// The runtime's encoder for this family is known to be weak.
    pub weak_encoder: bool,
}

/// Serialized by name; deserialized through [`FromStr`], so configs may also use a MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ContainerFormat {
    WebmVp9,
    WebmVp8,
    Mp4H264Baseline,
    Mp4H264,
    Mp4,
    Gif,
}

impl ContainerFormat {
    /// Video formats in preference order.
    pub const VIDEO: [ContainerFormat; 5] = [
        ContainerFormat::WebmVp9,
        ContainerFormat::WebmVp8,
        ContainerFormat::Mp4H264Baseline,
        ContainerFormat::Mp4H264,
        ContainerFormat::Mp4,
    ];

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::WebmVp9 => "video/webm;codecs=vp9",
            Self::WebmVp8 => "video/webm;codecs=vp8",
            Self::Mp4H264Baseline => "video/mp4;codecs=avc1.42E01E",
            Self::Mp4H264 => "video/mp4;codecs=h264",
            Self::Mp4 => "video/mp4",
            Self::Gif => "image/gif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::WebmVp9 | Self::WebmVp8 => "webm",
            Self::Mp4H264Baseline | Self::Mp4H264 | Self::Mp4 => "mp4",
            Self::Gif => "gif",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::WebmVp9 => "WebM/VP9",
            Self::WebmVp8 => "WebM/VP8",
            Self::Mp4H264Baseline | Self::Mp4H264 => "MP4/H.264",
            Self::Mp4 => "MP4",
            Self::Gif => "GIF",
        }
    }

    /// Lower is preferred.
    pub fn priority(self) -> u8 {
        match self {
            Self::WebmVp9 => 1,
            Self::WebmVp8 => 2,
            Self::Mp4H264Baseline => 3,
            Self::Mp4H264 => 4,
            Self::Mp4 => 5,
            Self::Gif => 6,
        }
    }

    pub fn family(self) -> FormatFamily {
        match self {
            Self::WebmVp9 | Self::WebmVp8 => FormatFamily::Primary,
            Self::Mp4H264Baseline | Self::Mp4H264 | Self::Mp4 => FormatFamily::Secondary,
            Self::Gif => FormatFamily::Image,
        }
    }

    pub fn is_video(self) -> bool {
        self.family() != FormatFamily::Image
    }

    /// Planner hint, `None` for formats without a bitrate.
    pub fn hint(self, weak_encoder: bool) -> Option<FormatHint> {
        self.is_video().then_some(FormatHint {
            family: self.family(),
            weak_encoder,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::WebmVp9 => "webm-vp9",
            Self::WebmVp8 => "webm-vp8",
            Self::Mp4H264Baseline => "mp4-h264-baseline",
            Self::Mp4H264 => "mp4-h264",
            Self::Mp4 => "mp4",
            Self::Gif => "gif",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContainerFormat {
    type Err = StickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::VIDEO
            .into_iter()
            .chain([Self::Gif])
            .find(|f| f.name() == s || f.mime_type().eq_ignore_ascii_case(&s))
            .ok_or_else(|| StickerError::validation(format!("unknown container format '{s}'")))
    }
}

impl TryFrom<String> for ContainerFormat {
    type Error = StickerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Highest-priority video format the runtime can encode.
pub fn select_format(mut is_supported: impl FnMut(ContainerFormat) -> bool) -> Option<ContainerFormat> {
    ContainerFormat::VIDEO.into_iter().find(|&f| is_supported(f))
}

/// Download name for an exported sticker, e.g. `sticker_telegram.webm`.
pub fn default_file_name(platform: &str, format: ContainerFormat) -> String {
    format!("sticker_{platform}.{}", format.extension())
}
