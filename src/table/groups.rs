//! Function groups and the fixed symbol sets each table resolves.

use std::fmt;

use serde::Serialize;

/// Logical function group; one proc address table per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionGroup {
    /// Core AL 1.1
    Al,
    /// Core ALC 1.1 including capture
    Alc,
    /// EFX and vendor extensions
    AlExt,
}

impl FunctionGroup {
    pub const ALL: [FunctionGroup; 3] = [FunctionGroup::Al, FunctionGroup::Alc, FunctionGroup::AlExt];

    pub fn name(self) -> &'static str {
        match self {
            FunctionGroup::Al => "AL",
            FunctionGroup::Alc => "ALC",
            FunctionGroup::AlExt => "ALExt",
        }
    }

    pub fn function_names(self) -> &'static [&'static str] {
        match self {
            FunctionGroup::Al => AL_FUNCTIONS,
            FunctionGroup::Alc => ALC_FUNCTIONS,
            FunctionGroup::AlExt => AL_EXT_FUNCTIONS,
        }
    }
}

impl fmt::Display for FunctionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const AL_FUNCTIONS: &[&str] = &[
    // state
    "alEnable",
    "alDisable",
    "alIsEnabled",
    "alGetString",
    "alGetBooleanv",
    "alGetIntegerv",
    "alGetFloatv",
    "alGetDoublev",
    "alGetBoolean",
    "alGetInteger",
    "alGetFloat",
    "alGetDouble",
    "alGetError",
    "alIsExtensionPresent",
    "alGetProcAddress",
    "alGetEnumValue",
    "alDopplerFactor",
    "alDopplerVelocity",
    "alSpeedOfSound",
    "alDistanceModel",
    // listener
    "alListenerf",
    "alListener3f",
    "alListenerfv",
    "alListeneri",
    "alListener3i",
    "alListeneriv",
    "alGetListenerf",
    "alGetListener3f",
    "alGetListenerfv",
    "alGetListeneri",
    "alGetListener3i",
    "alGetListeneriv",
    // sources
    "alGenSources",
    "alDeleteSources",
    "alIsSource",
    "alSourcef",
    "alSource3f",
    "alSourcefv",
    "alSourcei",
    "alSource3i",
    "alSourceiv",
    "alGetSourcef",
    "alGetSource3f",
    "alGetSourcefv",
    "alGetSourcei",
    "alGetSource3i",
    "alGetSourceiv",
    "alSourcePlayv",
    "alSourceStopv",
    "alSourceRewindv",
    "alSourcePausev",
    "alSourcePlay",
    "alSourceStop",
    "alSourceRewind",
    "alSourcePause",
    "alSourceQueueBuffers",
    "alSourceUnqueueBuffers",
    // buffers
    "alGenBuffers",
    "alDeleteBuffers",
    "alIsBuffer",
    "alBufferData",
    "alBufferf",
    "alBuffer3f",
    "alBufferfv",
    "alBufferi",
    "alBuffer3i",
    "alBufferiv",
    "alGetBufferf",
    "alGetBuffer3f",
    "alGetBufferfv",
    "alGetBufferi",
    "alGetBuffer3i",
    "alGetBufferiv",
];

const ALC_FUNCTIONS: &[&str] = &[
    "alcCreateContext",
    "alcMakeContextCurrent",
    "alcProcessContext",
    "alcSuspendContext",
    "alcDestroyContext",
    "alcGetCurrentContext",
    "alcGetContextsDevice",
    "alcOpenDevice",
    "alcCloseDevice",
    "alcGetError",
    "alcIsExtensionPresent",
    "alcGetProcAddress",
    "alcGetEnumValue",
    "alcGetString",
    "alcGetIntegerv",
    "alcCaptureOpenDevice",
    "alcCaptureCloseDevice",
    "alcCaptureStart",
    "alcCaptureStop",
    "alcCaptureSamples",
];

const AL_EXT_FUNCTIONS: &[&str] = &[
    // ALC_EXT_EFX
    "alGenEffects",
    "alDeleteEffects",
    "alIsEffect",
    "alEffecti",
    "alEffectiv",
    "alEffectf",
    "alEffectfv",
    "alGetEffecti",
    "alGetEffectiv",
    "alGetEffectf",
    "alGetEffectfv",
    "alGenFilters",
    "alDeleteFilters",
    "alIsFilter",
    "alFilteri",
    "alFilteriv",
    "alFilterf",
    "alFilterfv",
    "alGetFilteri",
    "alGetFilteriv",
    "alGetFilterf",
    "alGetFilterfv",
    "alGenAuxiliaryEffectSlots",
    "alDeleteAuxiliaryEffectSlots",
    "alIsAuxiliaryEffectSlot",
    "alAuxiliaryEffectSloti",
    "alAuxiliaryEffectSlotiv",
    "alAuxiliaryEffectSlotf",
    "alAuxiliaryEffectSlotfv",
    "alGetAuxiliaryEffectSloti",
    "alGetAuxiliaryEffectSlotiv",
    "alGetAuxiliaryEffectSlotf",
    "alGetAuxiliaryEffectSlotfv",
    // ALC_SOFT_*
    "alcLoopbackOpenDeviceSOFT",
    "alcIsRenderFormatSupportedSOFT",
    "alcRenderSamplesSOFT",
    "alcDevicePauseSOFT",
    "alcDeviceResumeSOFT",
    "alcGetStringiSOFT",
    "alcResetDeviceSOFT",
    "alcReopenDeviceSOFT",
    // AL_SOFT_*
    "alDeferUpdatesSOFT",
    "alProcessUpdatesSOFT",
    "alGetStringiSOFT",
    "alBufferCallbackSOFT",
    "alEventControlSOFT",
    "alEventCallbackSOFT",
    "alSourcedSOFT",
    "alSource3dSOFT",
    "alSourcedvSOFT",
    "alGetSourcedSOFT",
    "alGetSource3dSOFT",
    "alGetSourcedvSOFT",
    "alSourcei64SOFT",
    "alSource3i64SOFT",
    "alSourcei64vSOFT",
    "alGetSourcei64SOFT",
    "alGetSource3i64SOFT",
    "alGetSourcei64vSOFT",
];
