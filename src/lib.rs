//! Geiger counter firmware for the ATmega128.
//!
//! Everything time-driven runs off one compare-match timer through the
//! [`rtos::Scheduler`]. The hardware layer only exists for AVR targets; the
//! rest builds on the host for tests.

#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod drivers;
pub mod logger;
pub mod rtos;

#[cfg(target_arch = "avr")]
pub mod hal;
