// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Volume change journal via `DeviceIoControl`
#![allow(unsafe_code)]

use super::{device_path, ChangeJournal, JournalError, OpenError, ReadRequest};
use async_trait::async_trait;
use jw_core::{JournalData, JournalId, Usn};
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle, RawHandle};
use std::sync::Arc;
use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};
use windows_sys::Win32::System::Ioctl::{FSCTL_QUERY_USN_JOURNAL, FSCTL_READ_USN_JOURNAL};
use windows_sys::Win32::System::IO::DeviceIoControl;

const GENERIC_READ: u32 = 0x8000_0000;

const ERROR_FILE_NOT_FOUND: i32 = 2;
const ERROR_PATH_NOT_FOUND: i32 = 3;
const ERROR_ACCESS_DENIED: i32 = 5;
const ERROR_INVALID_NAME: i32 = 123;
const ERROR_JOURNAL_DELETE_IN_PROGRESS: i32 = 1178;
const ERROR_JOURNAL_NOT_ACTIVE: i32 = 1179;
const ERROR_JOURNAL_ENTRY_DELETED: i32 = 1181;

/// USN_JOURNAL_DATA_V0
#[repr(C)]
#[derive(Default)]
struct UsnJournalData {
    usn_journal_id: u64,
    first_usn: i64,
    next_usn: i64,
    lowest_valid_usn: i64,
    max_usn: i64,
    maximum_size: u64,
    allocation_delta: u64,
}

/// READ_USN_JOURNAL_DATA_V1
#[repr(C)]
struct ReadUsnJournalData {
    start_usn: i64,
    reason_mask: u32,
    return_only_on_close: u32,
    timeout: u64,
    bytes_to_wait_for: u64,
    usn_journal_id: u64,
    min_major_version: u16,
    max_major_version: u16,
}

/// Change journal of one open volume
#[derive(Clone)]
pub struct WindowsJournal {
    volume: String,
    handle: Arc<OwnedHandle>,
}

impl WindowsJournal {
    pub fn open(volume: &str) -> Result<Self, OpenError> {
        let path = device_path(volume);
        let wide: Vec<u16> = std::ffi::OsStr::new(&path)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let handle = unsafe {
            CreateFileW(
                wide.as_ptr(),
                GENERIC_READ,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                std::ptr::null(),
                OPEN_EXISTING,
                0,
                0,
            )
        };

        if handle == INVALID_HANDLE_VALUE {
            let err = std::io::Error::last_os_error();
            return Err(match err.raw_os_error() {
                Some(ERROR_ACCESS_DENIED) => OpenError::AccessDenied(volume.to_string()),
                Some(ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND | ERROR_INVALID_NAME) => {
                    OpenError::NotFound(volume.to_string())
                }
                _ => OpenError::Other {
                    volume: volume.to_string(),
                    source: err,
                },
            });
        }

        // SAFETY: CreateFileW returned a valid handle that nothing else owns
        let owned = unsafe { OwnedHandle::from_raw_handle(handle as RawHandle) };
        Ok(Self {
            volume: volume.to_string(),
            handle: Arc::new(owned),
        })
    }

    fn raw(&self) -> HANDLE {
        self.handle.as_raw_handle() as HANDLE
    }
}

#[async_trait]
impl ChangeJournal for WindowsJournal {
    async fn query(&self) -> Result<JournalData, JournalError> {
        let mut data = UsnJournalData::default();
        let mut returned: u32 = 0;

        let ok = unsafe {
            DeviceIoControl(
                self.raw(),
                FSCTL_QUERY_USN_JOURNAL,
                std::ptr::null(),
                0,
                &mut data as *mut _ as *mut std::ffi::c_void,
                std::mem::size_of::<UsnJournalData>() as u32,
                &mut returned,
                std::ptr::null_mut(),
            )
        };
        if ok == 0 {
            let err = std::io::Error::last_os_error();
            return Err(JournalError::Unavailable(format!("{}: {}", self.volume, err)));
        }

        Ok(JournalData {
            journal_id: JournalId(data.usn_journal_id),
            first_usn: Usn(data.first_usn),
            next_usn: Usn(data.next_usn),
            lowest_valid_usn: Usn(data.lowest_valid_usn),
            max_usn: Usn(data.max_usn),
            maximum_size: data.maximum_size,
            allocation_delta: data.allocation_delta,
        })
    }

    async fn read(&self, request: &ReadRequest, buf: &mut [u8]) -> Result<usize, JournalError> {
        // Timeout and BytesToWaitFor of zero make the call return immediately
        let input = ReadUsnJournalData {
            start_usn: request.start_usn.0,
            reason_mask: request.reason_mask.bits(),
            return_only_on_close: u32::from(request.return_only_on_close),
            timeout: 0,
            bytes_to_wait_for: 0,
            usn_journal_id: request.journal_id.0,
            min_major_version: request.versions.min,
            max_major_version: request.versions.max,
        };
        let capacity = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let mut returned: u32 = 0;

        let ok = unsafe {
            DeviceIoControl(
                self.raw(),
                FSCTL_READ_USN_JOURNAL,
                &input as *const _ as *const std::ffi::c_void,
                std::mem::size_of::<ReadUsnJournalData>() as u32,
                buf.as_mut_ptr() as *mut std::ffi::c_void,
                capacity,
                &mut returned,
                std::ptr::null_mut(),
            )
        };
        if ok == 0 {
            let err = std::io::Error::last_os_error();
            return Err(match err.raw_os_error() {
                Some(
                    ERROR_JOURNAL_ENTRY_DELETED
                    | ERROR_JOURNAL_NOT_ACTIVE
                    | ERROR_JOURNAL_DELETE_IN_PROGRESS,
                ) => JournalError::Invalidated(format!("{}: {}", self.volume, err)),
                _ => JournalError::Transient(format!("{}: {}", self.volume, err)),
            });
        }

        Ok(returned as usize)
    }
}
