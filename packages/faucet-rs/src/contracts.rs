//! Faucet and token contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the deployed
//! `TokenFaucet` and `FaucetToken` contracts.

use alloy::sol;

sol! {
    /// Token faucet contract interface
    #[sol(rpc)]
    contract TokenFaucet {
        // ========================================================================
        // Claiming
        // ========================================================================

        /// Claim FAUCET_AMOUNT tokens for msg.sender
        function requestTokens() external;

        /// Whether the account may claim right now
        function canClaim(address user) external view returns (bool);

        /// Amount the account may still claim over its lifetime
        function remainingAllowance(address user) external view returns (uint256);

        // ========================================================================
        // Per-account state
        // ========================================================================

        /// Unix timestamp of the last claim (0 if never claimed)
        function lastClaimAt(address user) external view returns (uint256);

        /// Cumulative amount claimed by the account
        function totalClaimed(address user) external view returns (uint256);

        // ========================================================================
        // Faucet-wide state
        // ========================================================================

        function isPaused() external view returns (bool);

        function COOLDOWN_TIME() external view returns (uint256);

        function MAX_CLAIM_AMOUNT() external view returns (uint256);

        function FAUCET_AMOUNT() external view returns (uint256);

        function admin() external view returns (address);

        /// Pause or resume claims (admin only)
        function setPaused(bool paused) external;

        // ========================================================================
        // Events
        // ========================================================================

        event TokensClaimed(address indexed user, uint256 amount, uint256 timestamp);

        event FaucetPaused(bool paused);
    }

    /// Faucet-minted ERC20 token
    #[sol(rpc)]
    contract FaucetToken {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
        function MAX_SUPPLY() external view returns (uint256);
    }
}
