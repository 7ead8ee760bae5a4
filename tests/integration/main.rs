//! Integration tests for Gallery-Harvest
//!
//! These tests run the harvester over real HTTP against wiremock servers.

mod harvest_tests;
