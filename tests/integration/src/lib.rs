//! Integration tests for the Identify client live under tests/.
